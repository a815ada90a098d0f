//! Acceleration structures are one of the components at the heart of
//! any ray tracer. Without algorithms to reduce the number of
//! unnecessary ray intersection tests, tracing a single ray through a
//! scene would take time linear in the number of primitives in the
//! scene, since the ray would need to be tested against each
//! primitive in turn to find the closest intersection.
//!
//! - LinearAccel
//! - BspTree
//!
//! Both share the same storage: an object table (meshes first, then
//! planes), one **AccObj** per mesh triangle, and the list of planes
//! which have no finite bounds and are therefore always tested before
//! the bounded primitives.

// std
use std::sync::Arc;
// others
use log::warn;
// rs_bsp
use crate::accelerators::bsptree::BspTree;
use crate::accelerators::linear::LinearAccel;
use crate::core::geometry::{bnd3_union_bnd3f, Bounds3f, Ray};
use crate::core::paramset::ParamSet;
use crate::core::primitive::{AccObj, Object3D, ObjectId};
use crate::shapes::plane::Plane;
use crate::shapes::triangle::TriangleMesh;

pub mod bsptree;
pub mod linear;

pub enum Accelerator {
    Linear(LinearAccel),
    BspTree(BspTree),
}

impl Accelerator {
    /// Pick an accelerator by name (`"bsp"` or `"linear"`). Unknown
    /// names fall back to `"bsp"`.
    pub fn create(
        name: &str,
        meshes: Vec<Arc<TriangleMesh>>,
        planes: Vec<Arc<Plane>>,
        ps: &ParamSet,
    ) -> Accelerator {
        match name {
            "linear" => Accelerator::Linear(LinearAccel::new(meshes, planes)),
            "bsp" => Accelerator::BspTree(BspTree::create(meshes, planes, ps)),
            _ => {
                warn!("Accelerator \"{}\" unknown. Using \"bsp\".", name);
                Accelerator::BspTree(BspTree::create(meshes, planes, ps))
            }
        }
    }
    pub fn closest_hit(&self, ray: &mut Ray) -> bool {
        match self {
            Accelerator::Linear(accel) => accel.closest_hit(ray),
            Accelerator::BspTree(accel) => accel.closest_hit(ray),
        }
    }
    pub fn any_hit(&self, ray: &mut Ray) -> bool {
        match self {
            Accelerator::Linear(accel) => accel.any_hit(ray),
            Accelerator::BspTree(accel) => accel.any_hit(ray),
        }
    }
    pub fn object(&self, id: ObjectId) -> Option<&Object3D> {
        self.base().objects.get(id)
    }
    /// Bounds of all meshes; planes are not included.
    pub fn world_bound(&self) -> Bounds3f {
        self.base().bbox
    }
    pub fn primitive_count(&self) -> usize {
        self.base().primitives.len()
    }
    pub fn plane_count(&self) -> usize {
        self.base().planes.len()
    }
    fn base(&self) -> &AccelBase {
        match self {
            Accelerator::Linear(accel) => &accel.base,
            Accelerator::BspTree(accel) => &accel.base,
        }
    }
}

/// Storage and plane handling shared by all accelerators.
pub struct AccelBase {
    pub objects: Vec<Object3D>,
    pub primitives: Vec<AccObj>,
    pub planes: Vec<ObjectId>,
    pub bbox: Bounds3f,
}

impl AccelBase {
    pub fn new(meshes: Vec<Arc<TriangleMesh>>, planes: Vec<Arc<Plane>>) -> Self {
        let mut objects: Vec<Object3D> = Vec::with_capacity(meshes.len() + planes.len());
        let mut primitives: Vec<AccObj> = Vec::new();
        let mut bbox: Bounds3f = Bounds3f::default();
        for mesh in meshes {
            let id: ObjectId = objects.len();
            let object: Object3D = Object3D::Mesh(mesh);
            bbox = bnd3_union_bnd3f(&bbox, &object.compute_bbox());
            for prim_idx in 0..object.primitive_count() {
                primitives.push(AccObj::new(id, prim_idx, object.primitive_bbox(prim_idx)));
            }
            objects.push(object);
        }
        let mut plane_ids: Vec<ObjectId> = Vec::with_capacity(planes.len());
        for plane in planes {
            plane_ids.push(objects.len());
            objects.push(Object3D::Plane(plane));
        }
        AccelBase {
            objects,
            primitives,
            planes: plane_ids,
            bbox,
        }
    }
    /// Test one primitive reference and narrow `t_max` on success.
    pub fn test(&self, ray: &mut Ray, obj: &AccObj) -> bool {
        if self.objects[obj.object].intersect(ray, obj.prim_idx) {
            ray.hit_object = Some(obj.object);
            ray.t_max = ray.dist;
            true
        } else {
            false
        }
    }
    /// Test every plane, keeping the closest hit.
    pub fn closest_plane(&self, ray: &mut Ray) {
        for id in &self.planes {
            if self.objects[*id].intersect(ray, 0) {
                ray.hit_object = Some(*id);
                ray.t_max = ray.dist;
            }
        }
    }
    pub fn any_plane(&self, ray: &mut Ray) -> bool {
        for id in &self.planes {
            if self.objects[*id].intersect(ray, 0) {
                ray.hit_object = Some(*id);
                return true;
            }
        }
        false
    }
    pub fn finish(&self, ray: &mut Ray) -> bool {
        if ray.has_hit {
            ray.hit_pos = ray.position(ray.dist);
        }
        ray.has_hit
    }
}
