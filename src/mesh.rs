//! Loading of obstacle meshes from STL, PLY or OBJ files, and saving them as STL.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use nalgebra::Vector3;
use parry3d::shape::TriMesh;
use rs_read_trimesh::load_trimesh;
use stl_io::{Normal, Triangle, Vertex};
use tracing::info;
use crate::solver_error::IkSolverError;

/// Load the mesh in meters, the format is derived from the file extension.
pub fn load_obstacle_mesh<P: AsRef<Path>>(path: P) -> Result<TriMesh, IkSolverError> {
    let path = path.as_ref();
    let name = path.to_string_lossy().to_string();
    if !path.is_file() {
        return Err(IkSolverError::MeshLoadError {
            path: name,
            reason: "no such file".to_string(),
        });
    }
    let mesh = load_trimesh(&name, 1.0).map_err(|e| IkSolverError::MeshLoadError {
        path: name.clone(),
        reason: format!("{:?}", e),
    })?;
    info!("Loaded mesh '{}' with {} triangles", name, mesh.indices().len());
    Ok(mesh)
}

/// Write the mesh as binary STL, for instance to inspect the obstacle in other tools.
pub fn save_obstacle_mesh<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<(), IkSolverError> {
    let vertices = mesh.vertices();
    let triangles: Vec<Triangle> = mesh.indices().iter()
        .map(|[a, b, c]| {
            let (a, b, c) = (vertices[*a as usize], vertices[*b as usize], vertices[*c as usize]);
            let normal = (b - a).cross(&(c - a)).try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
            Triangle {
                normal: Normal::new([normal.x, normal.y, normal.z]),
                vertices: [a, b, c].map(|v| Vertex::new([v.x, v.y, v.z])),
            }
        })
        .collect();

    let mut writer = BufWriter::new(File::create(path)?);
    stl_io::write_stl(&mut writer, triangles.iter())?;
    Ok(())
}
