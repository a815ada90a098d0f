//! An infinite plane. It has no finite bounding box, so accelerators
//! keep planes apart from the bounded primitives and test them before
//! anything else.

// rs_bsp
use crate::core::base::{Float, DIVISION_EPSILON};
use crate::core::geometry::{vec3_coordinate_system, vec3_dot_vec3f};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f};
use crate::core::shape::Intersectable;

#[derive(Debug, Copy, Clone)]
pub struct Plane {
    pub position: Point3f,
    /// unit normal
    pub normal: Vector3f,
    pub tangent: Vector3f,
    pub binormal: Vector3f,
    d: Float,
}

impl Plane {
    pub fn new(position: Point3f, normal: Vector3f) -> Self {
        let normal: Vector3f = normal.normalize();
        let mut tangent: Vector3f = Vector3f::default();
        let mut binormal: Vector3f = Vector3f::default();
        vec3_coordinate_system(&normal, &mut tangent, &mut binormal);
        let d: Float = -vec3_dot_vec3f(&normal, &Vector3f::from(position));
        Plane {
            position,
            normal,
            tangent,
            binormal,
            d,
        }
    }
    /// Planar coordinates of a point on the plane relative to
    /// *position*.
    pub fn get_uv(&self, hit_pos: &Point3f) -> (Float, Float) {
        let displacement: Vector3f = hit_pos - self.position;
        (
            vec3_dot_vec3f(&displacement, &self.tangent),
            vec3_dot_vec3f(&displacement, &self.binormal),
        )
    }
}

impl Intersectable for Plane {
    fn intersect(&self, ray: &mut Ray, prim_idx: usize) -> bool {
        let cos_theta: Float = vec3_dot_vec3f(&self.normal, &ray.direction);
        if cos_theta.abs() < DIVISION_EPSILON {
            return false;
        }
        let t: Float =
            -(vec3_dot_vec3f(&self.normal, &Vector3f::from(ray.origin)) + self.d) / cos_theta;
        if t < ray.t_min || t > ray.t_max {
            return false;
        }
        let (u, v) = self.get_uv(&ray.position(t));
        ray.has_hit = true;
        ray.dist = t;
        ray.hit_normal = self.normal;
        ray.hit_face_id = prim_idx;
        ray.u = u;
        ray.v = v;
        true
    }
    fn compute_bbox(&self) -> Bounds3f {
        Bounds3f::infinite()
    }
    fn primitive_bbox(&self, _prim_idx: usize) -> Bounds3f {
        Bounds3f::infinite()
    }
    fn primitive_count(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::base::BIG;

    fn ground() -> Plane {
        Plane::new(Point3f::new(0.0, -1.0, 0.0), Vector3f::new(0.0, 2.0, 0.0))
    }

    #[test]
    fn hit_from_above() {
        let plane = ground();
        assert_eq!(plane.normal, Vector3f::new(0.0, 1.0, 0.0));
        let mut ray = Ray::new(Point3f::new(1.0, 3.0, 2.0), Vector3f::new(0.0, -1.0, 0.0));
        assert!(plane.intersect(&mut ray, 0));
        assert!((ray.dist - 4.0).abs() < 1.0e-6);
        assert_eq!(ray.hit_normal, plane.normal);
        let (u, v) = plane.get_uv(&ray.position(ray.dist));
        assert_eq!((u, v), (ray.u, ray.v));
        assert!((u * u + v * v - 5.0).abs() < 1.0e-5);
    }

    #[test]
    fn misses() {
        let plane = ground();
        // parallel
        let mut ray = Ray::new(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(!plane.intersect(&mut ray, 0));
        // pointing away
        let mut ray = Ray::new(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0));
        assert!(!plane.intersect(&mut ray, 0));
        // beyond t_max
        let mut ray = Ray::new(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        ray.t_max = 0.5;
        assert!(!plane.intersect(&mut ray, 0));
        assert!(!ray.has_hit);
        assert_eq!(ray.dist, BIG);
        assert_eq!(ray.hit_normal, Vector3f::default());
    }

    #[test]
    fn unbounded() {
        let plane = ground();
        assert_eq!(plane.primitive_count(), 1);
        assert_eq!(plane.compute_bbox().p_max.x, BIG);
        assert_eq!(plane.primitive_bbox(0).p_min.y, -BIG);
    }
}
