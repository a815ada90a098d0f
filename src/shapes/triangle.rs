// others
use eyre::{eyre, Result};
// rs_bsp
use crate::core::base::{clamp_t, Float, DIVISION_EPSILON};
use crate::core::geometry::{vec3_cross_vec3, vec3_dot_vec3f};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f};
use crate::core::shape::Intersectable;

#[derive(Debug, Clone)]
pub struct TriangleMesh {
    /// the total number of triangles in the mesh
    pub n_triangles: usize,
    /// vector of vertex indices, three per triangle
    pub vertex_indices: Vec<usize>,
    /// the total number of vertices in the mesh
    pub n_vertices: usize,
    /// vector of *n_vertices* vertex positions
    pub p: Vec<Point3f>,
    /// per vertex normals, indexed like *p* (can be empty)
    pub n: Vec<Vector3f>,
}

impl TriangleMesh {
    /// Checks that the index buffer describes whole triangles and only
    /// refers to existing vertices, and that normals (if any) match the
    /// vertex count.
    pub fn new(p: Vec<Point3f>, vertex_indices: Vec<usize>, n: Vec<Vector3f>) -> Result<Self> {
        if vertex_indices.len() % 3 != 0 {
            return Err(eyre!(
                "{} vertex indices do not form whole triangles",
                vertex_indices.len()
            ));
        }
        if let Some(bad) = vertex_indices.iter().find(|&&i| i >= p.len()) {
            return Err(eyre!(
                "vertex index {} out of range ({} vertices)",
                bad,
                p.len()
            ));
        }
        if !n.is_empty() && n.len() != p.len() {
            return Err(eyre!(
                "{} normals given for {} vertices",
                n.len(),
                p.len()
            ));
        }
        Ok(TriangleMesh {
            n_triangles: vertex_indices.len() / 3,
            n_vertices: p.len(),
            vertex_indices,
            p,
            n,
        })
    }
    pub fn has_normals(&self) -> bool {
        !self.n.is_empty()
    }
    fn vertices(&self, face: usize) -> (Point3f, Point3f, Point3f) {
        (
            self.p[self.vertex_indices[face * 3]],
            self.p[self.vertex_indices[face * 3 + 1]],
            self.p[self.vertex_indices[face * 3 + 2]],
        )
    }
    /// Replace the vertex normals by the angle weighted average of the
    /// normals of all adjacent faces.
    pub fn compute_normals(&mut self) {
        let mut n: Vec<Vector3f> = vec![Vector3f::default(); self.n_vertices];
        for face in 0..self.n_triangles {
            let (p0, p1, p2) = self.vertices(face);
            let face_normal: Vector3f = vec3_cross_vec3(&(p1 - p0), &(p2 - p0)).normalize();
            let corners: [usize; 3] = [
                self.vertex_indices[face * 3],
                self.vertex_indices[face * 3 + 1],
                self.vertex_indices[face * 3 + 2],
            ];
            for j in 0..3 {
                let p: Point3f = self.p[corners[j]];
                let a: Vector3f = (self.p[corners[(j + 1) % 3]] - p).normalize();
                let b: Vector3f = (self.p[corners[(j + 2) % 3]] - p).normalize();
                let d: Float = clamp_t(vec3_dot_vec3f(&a, &b), -1.0, 1.0);
                n[corners[j]] += face_normal * d.acos();
            }
        }
        self.n = n.iter().map(|v| v.normalize()).collect();
    }
    /// Total area of all triangles.
    pub fn surface_area(&self) -> Float {
        (0..self.n_triangles)
            .map(|face| {
                let (p0, p1, p2) = self.vertices(face);
                0.5 * vec3_cross_vec3(&(p1 - p0), &(p2 - p0)).length()
            })
            .sum()
    }
}

impl Intersectable for TriangleMesh {
    fn intersect(&self, ray: &mut Ray, prim_idx: usize) -> bool {
        let (v0, v1, v2) = self.vertices(prim_idx);
        let e0: Vector3f = v1 - v0;
        let e1: Vector3f = v0 - v2;
        let n: Vector3f = vec3_cross_vec3(&e0, &e1);
        let q: Float = vec3_dot_vec3f(&ray.direction, &n);
        if q.abs() < DIVISION_EPSILON {
            return false;
        }
        let q: Float = 1.0 / q;
        let o_to_v0: Vector3f = v0 - ray.origin;
        let t: Float = vec3_dot_vec3f(&o_to_v0, &n) * q;
        if t < ray.t_min || t > ray.t_max {
            return false;
        }
        let n_tmp: Vector3f = vec3_cross_vec3(&o_to_v0, &ray.direction);
        let v: Float = vec3_dot_vec3f(&n_tmp, &e1) * q;
        if v < 0.0 {
            return false;
        }
        let w: Float = vec3_dot_vec3f(&n_tmp, &e0) * q;
        if w < 0.0 || v + w > 1.0 {
            return false;
        }
        ray.has_hit = true;
        ray.dist = t;
        ray.u = v;
        ray.v = w;
        ray.hit_face_id = prim_idx;
        ray.hit_normal = if self.has_normals() {
            let n0: Vector3f = self.n[self.vertex_indices[prim_idx * 3]];
            let n1: Vector3f = self.n[self.vertex_indices[prim_idx * 3 + 1]];
            let n2: Vector3f = self.n[self.vertex_indices[prim_idx * 3 + 2]];
            (n0 * (1.0 - v - w) + n1 * v + n2 * w).normalize()
        } else {
            (-n).normalize()
        };
        true
    }
    fn compute_bbox(&self) -> Bounds3f {
        let mut bbox: Bounds3f = Bounds3f::default();
        for idx in &self.vertex_indices {
            bbox.add_point(&self.p[*idx]);
        }
        bbox
    }
    fn primitive_bbox(&self, prim_idx: usize) -> Bounds3f {
        let (p0, p1, p2) = self.vertices(prim_idx);
        let mut bbox: Bounds3f = Bounds3f::new(p0, p1);
        bbox.add_point(&p2);
        bbox
    }
    fn primitive_count(&self) -> usize {
        self.n_triangles
    }
}

/// Axis-aligned cube `[-size/2, size/2]^3` made of 12 outward facing
/// triangles without vertex normals.
pub fn create_cube(size: Float) -> TriangleMesh {
    let h: Float = size * 0.5;
    let mut p: Vec<Point3f> = Vec::with_capacity(8);
    for corner in 0..8_u8 {
        p.push(Point3f {
            x: if corner & 1 == 0 { -h } else { h },
            y: if corner & 2 == 0 { -h } else { h },
            z: if corner & 4 == 0 { -h } else { h },
        });
    }
    #[rustfmt::skip]
    let vertex_indices: Vec<usize> = vec![
        // -z, +z
        0, 2, 1,  1, 2, 3,
        4, 5, 6,  5, 7, 6,
        // -y, +y
        0, 1, 4,  1, 5, 4,
        2, 6, 3,  3, 6, 7,
        // -x, +x
        0, 4, 2,  2, 4, 6,
        1, 3, 5,  3, 7, 5,
    ];
    TriangleMesh {
        n_triangles: 12,
        n_vertices: 8,
        vertex_indices,
        p,
        n: Vec::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::base::BIG;
    use std::f32::consts::PI;

    fn angle_between(a: &Vector3f, b: &Vector3f) -> Float {
        clamp_t(vec3_dot_vec3f(a, b), -1.0, 1.0).acos() * 180.0 / PI
    }

    fn single_triangle() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_bad_indices() {
        let p = vec![Point3f::default(); 3];
        assert!(TriangleMesh::new(p.clone(), vec![0, 1], Vec::new()).is_err());
        assert!(TriangleMesh::new(p.clone(), vec![0, 1, 3], Vec::new()).is_err());
        assert!(TriangleMesh::new(p, vec![0, 1, 2], vec![Vector3f::default()]).is_err());
    }

    #[test]
    fn hit_fills_record() {
        let mesh = single_triangle();
        let mut ray = Ray::new(
            Point3f::new(0.25, 0.25, 2.0),
            Vector3f::new(0.0, 0.0, -1.0),
        );
        assert!(mesh.intersect(&mut ray, 0));
        assert!(ray.has_hit);
        assert!((ray.dist - 2.0).abs() < 1.0e-6);
        assert_eq!(ray.hit_face_id, 0);
        assert!((ray.u - 0.25).abs() < 1.0e-6);
        assert!((ray.v - 0.25).abs() < 1.0e-6);
        // counter-clockwise seen from +z
        assert!((ray.hit_normal.z - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn miss_leaves_ray_untouched() {
        let mesh = single_triangle();
        let mut ray = Ray::new(
            Point3f::new(0.75, 0.75, 2.0),
            Vector3f::new(0.0, 0.0, -1.0),
        );
        assert!(!mesh.intersect(&mut ray, 0));
        assert!(!ray.has_hit);
        assert_eq!(ray.dist, BIG);
        // outside the interval
        let mut ray = Ray::new(
            Point3f::new(0.25, 0.25, 2.0),
            Vector3f::new(0.0, 0.0, -1.0),
        );
        ray.t_max = 1.5;
        assert!(!mesh.intersect(&mut ray, 0));
        // parallel
        let mut ray = Ray::new(
            Point3f::new(-1.0, 0.25, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
        );
        assert!(!mesh.intersect(&mut ray, 0));
    }

    #[test]
    fn cube_normals_point_outwards() {
        let mut cube = create_cube(1.0);
        assert_eq!(cube.primitive_count(), 12);
        assert!((cube.surface_area() - 6.0).abs() < 1.0e-5);
        let bbox = cube.compute_bbox();
        assert_eq!(bbox.p_min, Point3f::new(-0.5, -0.5, -0.5));
        assert_eq!(bbox.p_max, Point3f::new(0.5, 0.5, 0.5));
        for face in 0..12 {
            let (p0, p1, p2) = cube.vertices(face);
            let centroid = Vector3f::from(p0 + p1 + p2) / 3.0;
            let mut ray = Ray::new(Point3f::from(centroid * 3.0), -centroid.normalize());
            assert!(cube.intersect(&mut ray, face));
            assert!(vec3_dot_vec3f(&ray.hit_normal, &centroid) > 0.0);
        }
        cube.compute_normals();
        assert!(cube.has_normals());
        let corner = Vector3f::new(1.0, 1.0, 1.0).normalize();
        let n7 = cube.n[7];
        assert!(angle_between(&n7, &corner) < 1.0);
    }
}
