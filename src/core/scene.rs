//! The **Scene** owns the geometry and the accelerator built over it.
//! Everything that traces rays goes through **intersect()** (closest
//! hit) or **occluded()** (any hit).

// std
use std::sync::Arc;
// others
use log::info;
use rayon::prelude::*;
// rs_bsp
use crate::accelerators::Accelerator;
use crate::core::base::Float;
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::paramset::ParamSet;
use crate::shapes::plane::Plane;
use crate::shapes::triangle::TriangleMesh;

pub struct Scene {
    pub accelerator: Accelerator,
}

impl Scene {
    /// Builds the accelerator named by the `"accelerator"` parameter
    /// (default `"bsp"`), passing *ps* on for its settings.
    pub fn new(meshes: Vec<TriangleMesh>, planes: Vec<Plane>, ps: &ParamSet) -> Self {
        let area: Float = meshes.iter().map(|m| m.surface_area()).sum();
        let triangles: usize = meshes.iter().map(|m| m.n_triangles).sum();
        info!(
            "Scene: {} meshes ({} triangles, area {}), {} planes",
            meshes.len(),
            triangles,
            area,
            planes.len()
        );
        let name: String = ps.find_one_string("accelerator", String::from("bsp"));
        let accelerator: Accelerator = Accelerator::create(
            &name,
            meshes.into_iter().map(Arc::new).collect(),
            planes.into_iter().map(Arc::new).collect(),
            ps,
        );
        info!(
            "Accelerator holds {} primitives and {} planes",
            accelerator.primitive_count(),
            accelerator.plane_count()
        );
        Scene { accelerator }
    }
    pub fn intersect(&self, ray: &mut Ray) -> bool {
        self.accelerator.closest_hit(ray)
    }
    pub fn occluded(&self, ray: &mut Ray) -> bool {
        self.accelerator.any_hit(ray)
    }
    /// Closest hits for a batch of independent rays, traced on the
    /// rayon thread pool. Returns the number of rays that hit.
    pub fn intersect_all(&self, rays: &mut [Ray]) -> usize {
        rays.par_iter_mut()
            .map(|ray| self.intersect(ray) as usize)
            .sum()
    }
    pub fn world_bound(&self) -> Bounds3f {
        self.accelerator.world_bound()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Point3f, Vector3f};
    use crate::core::primitive::Object3D;
    use crate::shapes::triangle::create_cube;

    fn scene_with(accelerator: &str) -> Scene {
        let mut ps = ParamSet::default();
        ps.add_string(String::from("accelerator"), String::from(accelerator));
        Scene::new(
            vec![create_cube(2.0)],
            vec![Plane::new(
                Point3f::new(0.0, -1.0, 0.0),
                Vector3f::new(0.0, 1.0, 0.0),
            )],
            &ps,
        )
    }

    #[test]
    fn accelerator_by_name() {
        assert!(matches!(scene_with("linear").accelerator, Accelerator::Linear(_)));
        assert!(matches!(scene_with("bsp").accelerator, Accelerator::BspTree(_)));
        // unknown names fall back to the tree
        assert!(matches!(scene_with("kdtree").accelerator, Accelerator::BspTree(_)));
    }

    #[test]
    fn objects_are_tagged() {
        let scene = scene_with("bsp");
        assert_eq!(scene.accelerator.primitive_count(), 12);
        assert_eq!(scene.accelerator.plane_count(), 1);
        assert_eq!(scene.world_bound().p_max, Point3f::new(1.0, 1.0, 1.0));
        let mut ray = Ray::new(Point3f::new(3.0, -0.5, 0.25), Vector3f::new(-1.0, 0.0, 0.0));
        assert!(scene.intersect(&mut ray));
        let id = ray.hit_object.unwrap();
        assert!(matches!(scene.accelerator.object(id), Some(Object3D::Mesh(_))));
        let mut ray = Ray::new(Point3f::new(3.0, 0.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert!(scene.occluded(&mut ray));
        let id = ray.hit_object.unwrap();
        assert!(matches!(scene.accelerator.object(id), Some(Object3D::Plane(_))));
        assert!(scene.accelerator.object(id + 1).is_none());
    }

    #[test]
    fn batch_matches_single_queries() {
        let scene = scene_with("bsp");
        let mut rays: Vec<Ray> = (0..64)
            .map(|i| {
                let x = -3.0 + 6.0 * i as Float / 63.0;
                Ray::new(Point3f::new(x, 0.3, 5.0), Vector3f::new(0.0, -0.2, -1.0).normalize())
            })
            .collect();
        let mut singles = rays.clone();
        let hits = scene.intersect_all(&mut rays);
        let mut expected: usize = 0;
        for (batch, single) in rays.iter().zip(singles.iter_mut()) {
            if scene.intersect(single) {
                expected += 1;
            }
            assert_eq!(batch.has_hit, single.has_hit);
            assert_eq!(batch.dist, single.dist);
        }
        assert_eq!(hits, expected);
        // every ray eventually reaches the floor
        assert_eq!(hits, 64);
    }
}
