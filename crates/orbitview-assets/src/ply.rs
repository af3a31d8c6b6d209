//! Stanford PLY loading (ASCII and binary).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use glam::Vec3;
use orbitview_core::{Mesh, Model};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{LoadError, LoadResult};
use crate::loader::model_name;

fn scalar(property: &Property) -> Option<f32> {
    Some(match *property {
        Property::Char(v) => f32::from(v),
        Property::UChar(v) => f32::from(v),
        Property::Short(v) => f32::from(v),
        Property::UShort(v) => f32::from(v),
        Property::Int(v) => v as f32,
        Property::UInt(v) => v as f32,
        Property::Float(v) => v,
        Property::Double(v) => v as f32,
        _ => return None,
    })
}

fn index_list(property: &Property) -> Option<Vec<u32>> {
    // Negative indices are invalid; mapping them to u32::MAX lets Mesh::new reject them.
    let signed = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);
    Some(match property {
        Property::ListChar(v) => v.iter().map(|&i| signed(i64::from(i))).collect(),
        Property::ListUChar(v) => v.iter().map(|&i| u32::from(i)).collect(),
        Property::ListShort(v) => v.iter().map(|&i| signed(i64::from(i))).collect(),
        Property::ListUShort(v) => v.iter().map(|&i| u32::from(i)).collect(),
        Property::ListInt(v) => v.iter().map(|&i| signed(i64::from(i))).collect(),
        Property::ListUInt(v) => v.clone(),
        _ => return None,
    })
}

fn vec3_of(element: &DefaultElement, keys: [&str; 3]) -> Option<Vec3> {
    let x = element.get(keys[0]).and_then(scalar)?;
    let y = element.get(keys[1]).and_then(scalar)?;
    let z = element.get(keys[2]).and_then(scalar)?;
    Some(Vec3::new(x, y, z))
}

/// Loads a PLY file from disk.
pub fn load_ply(path: &Path) -> LoadResult<Model> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    read_ply(&mut BufReader::new(file), &model_name(path))
}

/// Decodes a PLY stream: `vertex` elements with `x y z` (and optionally
/// `nx ny nz`), `face` elements with `vertex_indices`. Polygons are fanned.
pub fn read_ply<R: Read>(reader: &mut R, name: &str) -> LoadResult<Model> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(reader)
        .map_err(|e| LoadError::Ply(e.to_string()))?;

    let vertices = ply
        .payload
        .get("vertex")
        .ok_or_else(|| LoadError::Ply("missing 'vertex' element".to_string()))?;

    let positions = vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            vec3_of(v, ["x", "y", "z"])
                .ok_or_else(|| LoadError::Ply(format!("vertex {i} lacks x/y/z")))
        })
        .collect::<LoadResult<Vec<Vec3>>>()?;

    let normals: Option<Vec<Vec3>> = vertices
        .iter()
        .map(|v| vec3_of(v, ["nx", "ny", "nz"]))
        .collect();

    let mut indices = Vec::new();
    for face in ply.payload.get("face").map(Vec::as_slice).unwrap_or_default() {
        let Some(polygon) = face
            .get("vertex_indices")
            .or_else(|| face.get("vertex_index"))
            .and_then(index_list)
        else {
            continue;
        };
        for i in 1..polygon.len().saturating_sub(1) {
            indices.extend_from_slice(&[polygon[0], polygon[i], polygon[i + 1]]);
        }
    }

    let model = Model::new(name, vec![Mesh::new(positions, normals, indices)?]);
    if model.is_empty() {
        return Err(LoadError::EmptyModel(name.to_string()));
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
4 0 1 2 3
";

    #[test]
    fn test_ascii_quad_is_fanned() {
        let model = read_ply(&mut QUAD.as_bytes(), "quad").unwrap();
        assert_eq!(model.triangle_count(), 2);
        let mesh = &model.meshes()[0];
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        // computed normals point out of the quad's front face
        assert!((mesh.normals[0] - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_vertices_without_faces_are_empty() {
        let src = "ply
format ascii 1.0
element vertex 1
property double x
property double y
property double z
end_header
0.5 0.5 0.5
";
        let err = read_ply(&mut src.as_bytes(), "cloud").unwrap_err();
        assert!(matches!(err, LoadError::EmptyModel(_)));
    }

    #[test]
    fn test_out_of_range_face_is_rejected() {
        let src = QUAD.replace("4 0 1 2 3", "3 0 1 9");
        let err = read_ply(&mut src.as_bytes(), "bad").unwrap_err();
        assert!(matches!(err, LoadError::Invalid(_)));
    }

    #[test]
    fn test_not_a_ply() {
        let err = read_ply(&mut "solid cube".as_bytes(), "stl").unwrap_err();
        assert!(matches!(err, LoadError::Ply(_)));
    }
}
