//! Brute force baseline: every primitive is tested against every ray.
//! Slow, but trivially correct, which makes it the reference the
//! **BspTree** is checked against.

// std
use std::sync::Arc;
// others
use log::info;
// rs_bsp
use crate::accelerators::AccelBase;
use crate::core::geometry::Ray;
use crate::shapes::plane::Plane;
use crate::shapes::triangle::TriangleMesh;

pub struct LinearAccel {
    pub base: AccelBase,
}

impl LinearAccel {
    pub fn new(meshes: Vec<Arc<TriangleMesh>>, planes: Vec<Arc<Plane>>) -> Self {
        let base: AccelBase = AccelBase::new(meshes, planes);
        info!(
            "Linear accelerator over {} primitives and {} planes",
            base.primitives.len(),
            base.planes.len()
        );
        LinearAccel { base }
    }
    pub fn closest_hit(&self, ray: &mut Ray) -> bool {
        self.base.closest_plane(ray);
        for obj in &self.base.primitives {
            self.base.test(ray, obj);
        }
        self.base.finish(ray)
    }
    pub fn any_hit(&self, ray: &mut Ray) -> bool {
        if self.base.any_plane(ray) {
            return self.base.finish(ray);
        }
        for obj in &self.base.primitives {
            if self.base.test(ray, obj) {
                return self.base.finish(ray);
            }
        }
        false
    }
}
