//! The **Object3D** enum is the bridge between the geometry kinds and
//! the accelerators. An **AccObj** is the reference an accelerator
//! keeps per primitive: which object, which primitive inside of it,
//! and the cached bounding box.

// std
use std::sync::Arc;
// rs_bsp
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::shape::Intersectable;
use crate::shapes::plane::Plane;
use crate::shapes::triangle::TriangleMesh;

/// Index into an accelerator's object table (meshes first, then
/// planes).
pub type ObjectId = usize;

pub enum Object3D {
    Mesh(Arc<TriangleMesh>),
    Plane(Arc<Plane>),
}

impl Object3D {
    pub fn intersect(&self, ray: &mut Ray, prim_idx: usize) -> bool {
        match self {
            Object3D::Mesh(mesh) => mesh.intersect(ray, prim_idx),
            Object3D::Plane(plane) => plane.intersect(ray, prim_idx),
        }
    }
    pub fn compute_bbox(&self) -> Bounds3f {
        match self {
            Object3D::Mesh(mesh) => mesh.compute_bbox(),
            Object3D::Plane(plane) => plane.compute_bbox(),
        }
    }
    pub fn primitive_bbox(&self, prim_idx: usize) -> Bounds3f {
        match self {
            Object3D::Mesh(mesh) => mesh.primitive_bbox(prim_idx),
            Object3D::Plane(plane) => plane.primitive_bbox(prim_idx),
        }
    }
    pub fn primitive_count(&self) -> usize {
        match self {
            Object3D::Mesh(mesh) => mesh.primitive_count(),
            Object3D::Plane(plane) => plane.primitive_count(),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct AccObj {
    pub object: ObjectId,
    pub prim_idx: usize,
    pub bbox: Bounds3f,
}

impl AccObj {
    pub fn new(object: ObjectId, prim_idx: usize, bbox: Bounds3f) -> Self {
        AccObj {
            object,
            prim_idx,
            bbox,
        }
    }
}
