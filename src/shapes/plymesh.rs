//! Stanford PLY meshes, read with **ply-rs**.
//!
//! The `vertex` element must provide `x`, `y`, `z` and may provide
//! `nx`, `ny`, `nz`. Faces come from the `face` element's
//! `vertex_indices` (or `vertex_index`) list; polygons with more than
//! three corners are split into a triangle fan.

// std
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
// others
use eyre::{eyre, Result, WrapErr};
use log::{info, warn};
use ply_rs::parser;
use ply_rs::ply::{self, Property};
// rs_bsp
use crate::core::base::Float;
use crate::core::geometry::{Point3f, Vector3f};
use crate::shapes::triangle::TriangleMesh;

fn property_as_float(property: &Property) -> Option<Float> {
    match *property {
        Property::Char(v) => Some(v as Float),
        Property::UChar(v) => Some(v as Float),
        Property::Short(v) => Some(v as Float),
        Property::UShort(v) => Some(v as Float),
        Property::Int(v) => Some(v as Float),
        Property::UInt(v) => Some(v as Float),
        Property::Float(v) => Some(v as Float),
        Property::Double(v) => Some(v as Float),
        _ => None,
    }
}

fn property_as_indices(property: &Property) -> Option<Vec<i64>> {
    match property {
        Property::ListChar(l) => Some(l.iter().map(|&i| i as i64).collect()),
        Property::ListUChar(l) => Some(l.iter().map(|&i| i as i64).collect()),
        Property::ListShort(l) => Some(l.iter().map(|&i| i as i64).collect()),
        Property::ListUShort(l) => Some(l.iter().map(|&i| i as i64).collect()),
        Property::ListInt(l) => Some(l.iter().map(|&i| i as i64).collect()),
        Property::ListUInt(l) => Some(l.iter().map(|&i| i as i64).collect()),
        _ => None,
    }
}

fn find_float(element: &ply::DefaultElement, key: &str) -> Option<Float> {
    element.get(key).and_then(property_as_float)
}

pub fn load_ply<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path: &Path = path.as_ref();
    let file: File =
        File::open(path).wrap_err_with(|| format!("failed to open PLY file {:?}", path))?;
    let mut reader = BufReader::new(file);
    let ply = parser::Parser::<ply::DefaultElement>::new()
        .read_ply(&mut reader)
        .wrap_err_with(|| format!("failed to parse PLY file {:?}", path))?;
    let vertices = ply
        .payload
        .get("vertex")
        .ok_or_else(|| eyre!("PLY file {:?} has no vertex element", path))?;
    let mut p: Vec<Point3f> = Vec::with_capacity(vertices.len());
    let mut n: Vec<Vector3f> = Vec::with_capacity(vertices.len());
    let mut with_normals: bool = true;
    for (i, vertex) in vertices.iter().enumerate() {
        match (
            find_float(vertex, "x"),
            find_float(vertex, "y"),
            find_float(vertex, "z"),
        ) {
            (Some(x), Some(y), Some(z)) => p.push(Point3f::new(x, y, z)),
            _ => return Err(eyre!("PLY vertex {} in {:?} lacks coordinates", i, path)),
        }
        match (
            find_float(vertex, "nx"),
            find_float(vertex, "ny"),
            find_float(vertex, "nz"),
        ) {
            (Some(x), Some(y), Some(z)) => n.push(Vector3f::new(x, y, z)),
            _ => with_normals = false,
        }
    }
    if !with_normals {
        n.clear();
    }
    let mut vertex_indices: Vec<usize> = Vec::new();
    let mut skipped: usize = 0;
    if let Some(faces) = ply.payload.get("face") {
        for (i, face) in faces.iter().enumerate() {
            let indices: Vec<i64> = face
                .get("vertex_indices")
                .or_else(|| face.get("vertex_index"))
                .and_then(property_as_indices)
                .ok_or_else(|| eyre!("PLY face {} in {:?} has no vertex index list", i, path))?;
            if indices.len() < 3 {
                skipped += 1;
                continue;
            }
            if let Some(bad) = indices.iter().find(|&&v| v < 0) {
                return Err(eyre!("PLY face {} in {:?} has negative index {}", i, path, bad));
            }
            for k in 1..indices.len() - 1 {
                vertex_indices.push(indices[0] as usize);
                vertex_indices.push(indices[k] as usize);
                vertex_indices.push(indices[k + 1] as usize);
            }
        }
    }
    if skipped > 0 {
        warn!("Skipped {} degenerate faces in {:?}", skipped, path);
    }
    let mesh: TriangleMesh = TriangleMesh::new(p, vertex_indices, n)
        .wrap_err_with(|| format!("malformed PLY file {:?}", path))?;
    info!(
        "Loaded {:?}: {} vertices, {} triangles",
        path, mesh.n_vertices, mesh.n_triangles
    );
    Ok(mesh)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("rs_bsp_{}_{}.ply", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn ascii_quad_with_normals() {
        let path = write_temp(
            "quad",
            "ply\n\
             format ascii 1.0\n\
             element vertex 4\n\
             property float x\n\
             property float y\n\
             property float z\n\
             property float nx\n\
             property float ny\n\
             property float nz\n\
             element face 1\n\
             property list uchar int vertex_indices\n\
             end_header\n\
             0 0 0 0 0 1\n\
             1 0 0 0 0 1\n\
             1 1 0 0 0 1\n\
             0 1 0 0 0 1\n\
             4 0 1 2 3\n",
        );
        let mesh = load_ply(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(mesh.n_vertices, 4);
        assert_eq!(mesh.n_triangles, 2);
        assert_eq!(mesh.vertex_indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.has_normals());
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let path = write_temp(
            "bad",
            "ply\n\
             format ascii 1.0\n\
             element vertex 3\n\
             property float x\n\
             property float y\n\
             property float z\n\
             element face 1\n\
             property list uchar int vertex_index\n\
             end_header\n\
             0 0 0\n\
             1 0 0\n\
             0 1 0\n\
             3 0 1 7\n",
        );
        let result = load_ply(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
