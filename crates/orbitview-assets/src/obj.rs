//! Wavefront OBJ loading.

use std::path::Path;

use glam::{Vec3, Vec4};
use orbitview_core::{Mesh, Model};

use crate::error::{LoadError, LoadResult};
use crate::loader::model_name;

fn to_vec3s(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect()
}

/// Loads an OBJ file. Polygons are triangulated; the diffuse color of the
/// material (when the `.mtl` file is found) becomes the base color.
pub fn load_obj(path: &Path) -> LoadResult<Model> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("no materials for '{}': {e}", path.display());
        Vec::new()
    });

    let mut meshes = Vec::with_capacity(models.len());
    for model in models {
        let mesh = model.mesh;
        let positions = to_vec3s(&mesh.positions);
        let normals = (mesh.normals.len() == mesh.positions.len()).then(|| to_vec3s(&mesh.normals));

        let mut out = Mesh::new(positions, normals, mesh.indices)?;
        if let Some(diffuse) = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|m| m.diffuse)
        {
            out = out.with_base_color(Vec4::new(diffuse[0], diffuse[1], diffuse[2], 1.0));
        }
        meshes.push(out);
    }

    let name = model_name(path);
    let model = Model::new(name.clone(), meshes);
    if model.is_empty() {
        return Err(LoadError::EmptyModel(name));
    }
    Ok(model)
}
