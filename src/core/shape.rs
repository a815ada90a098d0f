//! Careful abstraction of geometric shapes in a ray tracer is a key
//! component of a clean system design. All geometry handed to an
//! accelerator implements the **Intersectable** interface, and the
//! accelerator can use this interface without needing any details
//! about the underlying shape.
//!
//! A shape consists of one or more primitives (a triangle mesh has one
//! primitive per face, a plane exactly one). Accelerators address the
//! primitives by index and only ever look at their bounding boxes until
//! a ray actually has to be tested.

// rs_bsp
use crate::core::geometry::{Bounds3f, Ray};

pub trait Intersectable {
    /// Test primitive *prim_idx* against the interval `[t_min, t_max]`
    /// of the ray. On success fill in `has_hit`, `dist`, `hit_normal`,
    /// `hit_face_id` and the barycentric `u`, `v`; on failure leave the
    /// ray untouched.
    fn intersect(&self, ray: &mut Ray, prim_idx: usize) -> bool;
    /// Bounds of the whole shape.
    fn compute_bbox(&self) -> Bounds3f;
    fn primitive_bbox(&self, prim_idx: usize) -> Bounds3f;
    fn primitive_count(&self) -> usize;
}
