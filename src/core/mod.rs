//! Basic types shared by the accelerators, the shapes and the ray
//! caster: floats and constants, geometry, the intersectable
//! interface, primitive references, parameters, random numbers, the
//! camera and the scene.

pub mod base;
pub mod camera;
pub mod geometry;
pub mod paramset;
pub mod primitive;
pub mod rng;
pub mod scene;
pub mod shape;
