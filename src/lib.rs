//! # rs_bsp
//!
//! A ray tracing core built around a BSP tree. Triangle meshes and
//! infinite planes are handed to an [accelerator][accel] once; after
//! that any number of threads can ask it for the closest hit or any hit
//! along a [Ray][ray].
//!
//! There are two accelerators:
//!
//! 1. [linear][linear], testing every primitive (the reference answer)
//! 2. [BSP tree][bsp], splitting space with axis-aligned planes
//!
//! A small ray caster renders debug views (normals, depth, hit mask) of
//! a scene, the main render loop can be found [here].
//!
//! [accel]: accelerators/enum.Accelerator.html
//! [ray]: core/geometry/struct.Ray.html
//! [linear]: accelerators/linear/struct.LinearAccel.html
//! [bsp]: accelerators/bsptree/struct.BspTree.html
//! [here]: integrators/fn.render.html

#[macro_use]
extern crate impl_ops;

pub mod accelerators;
pub mod blockqueue;
pub mod core;
pub mod integrators;
pub mod shapes;
