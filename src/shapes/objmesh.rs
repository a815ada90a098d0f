//! Wavefront OBJ meshes, read with **tobj**. Polygons are triangulated
//! on load and all models of a file are merged into one triangle mesh.

// std
use std::path::Path;
// others
use eyre::{Result, WrapErr};
use log::{debug, info};
// rs_bsp
use crate::core::geometry::{Point3f, Vector3f};
use crate::shapes::triangle::TriangleMesh;

pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path: &Path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .wrap_err_with(|| format!("failed to load OBJ file {:?}", path))?;
    let with_normals: bool = models
        .iter()
        .all(|m| !m.mesh.normals.is_empty() && m.mesh.normals.len() == m.mesh.positions.len());
    let mut p: Vec<Point3f> = Vec::new();
    let mut n: Vec<Vector3f> = Vec::new();
    let mut vertex_indices: Vec<usize> = Vec::new();
    for model in &models {
        let offset: usize = p.len();
        debug!(
            "OBJ model {:?}: {} vertices, {} triangles",
            model.name,
            model.mesh.positions.len() / 3,
            model.mesh.indices.len() / 3
        );
        for xyz in model.mesh.positions.chunks_exact(3) {
            p.push(Point3f::new(xyz[0], xyz[1], xyz[2]));
        }
        if with_normals {
            for xyz in model.mesh.normals.chunks_exact(3) {
                n.push(Vector3f::new(xyz[0], xyz[1], xyz[2]));
            }
        }
        vertex_indices.extend(model.mesh.indices.iter().map(|&i| offset + i as usize));
    }
    let mesh: TriangleMesh = TriangleMesh::new(p, vertex_indices, n)
        .wrap_err_with(|| format!("malformed OBJ file {:?}", path))?;
    info!(
        "Loaded {:?}: {} vertices, {} triangles",
        path, mesh.n_vertices, mesh.n_triangles
    );
    Ok(mesh)
}
