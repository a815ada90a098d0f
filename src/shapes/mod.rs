//! The two kinds of geometry an accelerator can hold.
//!
//! - Plane
//! - Triangle mesh
//!
//! ## Planes
//!
//! Infinite planes given by a point and a normal. They report a single
//! primitive with an unbounded box.
//!
//! ## Triangle Meshes
//!
//! Meshes are loaded from Wavefront OBJ or Stanford PLY files. Each
//! triangle is a primitive of its own. Meshes without vertex normals
//! get smoothed normals computed on load.

// std
use std::path::Path;
// others
use eyre::{eyre, Result};
use log::debug;

pub mod objmesh;
pub mod plane;
pub mod plymesh;
pub mod triangle;

use crate::shapes::triangle::TriangleMesh;

/// Load a mesh, picking the reader by file extension.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path: &Path = path.as_ref();
    let extension: String = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let mut mesh: TriangleMesh = match extension.as_str() {
        "obj" => objmesh::load_obj(path)?,
        "ply" => plymesh::load_ply(path)?,
        _ => return Err(eyre!("unsupported mesh format {:?}", path)),
    };
    if !mesh.has_normals() {
        debug!("Computing vertex normals for {:?}", path);
        mesh.compute_normals();
    }
    Ok(mesh)
}
