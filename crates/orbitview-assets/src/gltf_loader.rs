//! glTF 2.0 (`.gltf` / `.glb`) loading.
//!
//! Node transforms of the default scene are baked into vertex positions, so
//! the returned [`Model`] is a flat list of meshes in model space. Primitives
//! compressed with `KHR_draco_mesh_compression` are decoded with draco-oxide.

use std::path::Path;

use draco_oxide::core::types::PointIdx;
use draco_oxide::{Attribute, ComponentDataType};
use glam::{Mat4, Vec3, Vec4};
use orbitview_core::{Mesh, Model};
use serde_json::Value;

use crate::error::{LoadError, LoadResult};
use crate::loader::model_name;

/// Extension name of Draco mesh compression.
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Required extensions whose geometry we cannot decode.
const UNSUPPORTED_COMPRESSION: &[&str] = &["EXT_meshopt_compression"];

/// Loads a glTF or GLB file.
pub fn load_gltf(path: &Path) -> LoadResult<Model> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
    load_gltf_slice(&bytes, path.parent(), &model_name(path))
}

/// Loads a glTF document from memory. External buffers resolve against `base`.
pub fn load_gltf_slice(bytes: &[u8], base: Option<&Path>, name: &str) -> LoadResult<Model> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice_without_validation(bytes)?;
    if let Some(ext) = document
        .extensions_required()
        .find(|ext| UNSUPPORTED_COMPRESSION.contains(ext))
    {
        return Err(LoadError::CompressedPrimitive(ext.to_string()));
    }

    // Draco accessors carry no bufferView, which the gltf validator rejects;
    // those documents are read unvalidated with bounds-checked lookups.
    let document = if document.extensions_used().any(|ext| ext == DRACO_EXTENSION) {
        document
    } else {
        gltf::Document::from_json(document.into_json())?
    };
    let buffers = gltf::import_buffers(&document, base, blob)?;

    let mut meshes = Vec::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&document, &node, Mat4::IDENTITY, &buffers, &mut meshes)?;
            }
        }
        None => {
            // No scene graph: show every mesh untransformed.
            for mesh in document.meshes() {
                collect_mesh(&document, &mesh, Mat4::IDENTITY, &buffers, &mut meshes)?;
            }
        }
    }

    let model = Model::new(name, meshes);
    if model.is_empty() {
        return Err(LoadError::EmptyModel(name.to_string()));
    }
    Ok(model)
}

fn collect_node(
    document: &gltf::Document,
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<Mesh>,
) -> LoadResult<()> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        collect_mesh(document, &mesh, world, buffers, out)?;
    }
    for child in node.children() {
        collect_node(document, &child, world, buffers, out)?;
    }
    Ok(())
}

fn collect_mesh(
    document: &gltf::Document,
    mesh: &gltf::Mesh<'_>,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<Mesh>,
) -> LoadResult<()> {
    for prim in mesh.primitives() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "skipping primitive {} of mesh {:?}: mode {:?} is not a triangle list",
                prim.index(),
                mesh.name(),
                prim.mode()
            );
            continue;
        }

        let geometry = match prim.extension_value(DRACO_EXTENSION) {
            Some(ext) => Some(decode_draco_primitive(document, ext, buffers)?),
            None => read_primitive(&prim, buffers),
        };
        let Some((positions, normals, indices)) = geometry else {
            log::warn!(
                "skipping primitive {} of mesh {:?}: no POSITION attribute",
                prim.index(),
                mesh.name()
            );
            continue;
        };

        let base_color = Vec4::from(prim.material().pbr_metallic_roughness().base_color_factor());
        let mut mesh = Mesh::new(positions, normals, indices)?.with_base_color(base_color);
        mesh.transform(&world);
        out.push(mesh);
    }
    Ok(())
}

type PrimitiveGeometry = (Vec<Vec3>, Option<Vec<Vec3>>, Vec<u32>);

fn read_primitive(
    prim: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Option<PrimitiveGeometry> {
    let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
    let positions: Vec<Vec3> = reader.read_positions()?.map(Vec3::from).collect();
    let normals = reader
        .read_normals()
        .map(|normals| normals.map(Vec3::from).collect());
    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    Some((positions, normals, indices))
}

/// Decodes the Draco stream a primitive's extension points at.
fn decode_draco_primitive(
    document: &gltf::Document,
    ext: &Value,
    buffers: &[gltf::buffer::Data],
) -> LoadResult<PrimitiveGeometry> {
    let invalid = |reason: &str| LoadError::DracoPrimitive(reason.to_string());

    let view_index = ext
        .get("bufferView")
        .and_then(Value::as_u64)
        .ok_or_else(|| invalid("missing bufferView"))?;
    let view = document
        .views()
        .nth(view_index as usize)
        .ok_or_else(|| invalid("bufferView out of range"))?;
    let bytes = buffers
        .get(view.buffer().index())
        .and_then(|data| data.0.get(view.offset()..view.offset() + view.length()))
        .ok_or_else(|| invalid("bufferView exceeds its buffer"))?;

    let decoded = draco_oxide::decode::decode_mesh(bytes)?;
    let attribute = |semantic: &str| {
        let id = ext.get("attributes")?.get(semantic)?.as_u64()?;
        decoded
            .attributes
            .iter()
            .find(|att| att.get_id().as_usize() as u64 == id)
    };

    let position = attribute("POSITION").ok_or_else(|| invalid("no POSITION attribute"))?;
    let positions =
        read_vec3_points(position).ok_or_else(|| invalid("POSITION is not float VEC3"))?;
    // A malformed normal attribute falls back to computed normals.
    let normals = attribute("NORMAL")
        .and_then(read_vec3_points)
        .filter(|n| n.len() == positions.len());

    let indices = decoded
        .faces
        .iter()
        .flat_map(|face| face.iter().map(|&p| usize::from(p) as u32))
        .collect();

    log::debug!(
        "decoded Draco primitive: {} points, {} faces",
        positions.len(),
        decoded.faces.len()
    );
    Ok((positions, normals, indices))
}

/// Per-point values of a float VEC3 attribute.
fn read_vec3_points(att: &Attribute) -> Option<Vec<Vec3>> {
    if att.get_component_type() != ComponentDataType::F32 || att.get_num_components() != 3 {
        return None;
    }
    let values = att.unique_vals_as_slice::<[f32; 3]>();
    (0..att.len())
        .map(|p| {
            let value = usize::from(att.get_unique_val_idx(PointIdx::from(p)));
            values.get(value).copied().map(Vec3::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // One triangle (0,0,0) (1,0,0) (0,1,0) with u16 indices 0 1 2.
    const TRIANGLE_BUFFER: &str = "data:application/octet-stream;base64,\
        AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA=";

    fn triangle_gltf(node: &str) -> String {
        format!(
            r#"{{
  "asset": {{"version": "2.0"}},
  "scene": 0,
  "scenes": [{{"nodes": [0]}}],
  "nodes": [{node}],
  "meshes": [{{"primitives": [{{"attributes": {{"POSITION": 0}}, "indices": 1}}]}}],
  "buffers": [{{"byteLength": 44, "uri": "{TRIANGLE_BUFFER}"}}],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 36, "byteLength": 6}}
  ],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0, 0, 0], "max": [1, 1, 0]}},
    {{"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}}
  ]
}}"#
        )
    }

    #[test]
    fn test_loads_embedded_triangle() {
        let json = triangle_gltf(r#"{"mesh": 0}"#);
        let model = load_gltf_slice(json.as_bytes(), None, "triangle").unwrap();
        assert_eq!(model.name(), "triangle");
        assert_eq!(model.triangle_count(), 1);

        let mesh = &model.meshes()[0];
        assert_eq!(mesh.positions[1], Vec3::X);
        // normals were computed from the winding
        assert!((mesh.normals[0] - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_node_transforms_are_baked() {
        let json = triangle_gltf(
            r#"{"children": [1], "translation": [10, 0, 0]},
               {"mesh": 0, "scale": [2, 2, 2]}"#,
        );
        let model = load_gltf_slice(json.as_bytes(), None, "nested").unwrap();
        let bounds = model.bounding_box().unwrap();
        assert!((bounds.min() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
        assert!((bounds.max() - Vec3::new(12.0, 2.0, 0.0)).length() < 1e-5);
    }

    /// A 2x2x2 cube centered on (5, 0, 0), 12 triangles with u16 indices.
    fn cube_glb() -> Vec<u8> {
        let corners: Vec<[f32; 3]> = (0..8)
            .map(|i| {
                let bit = |b: u32| if i & (1 << b) == 0 { -1.0 } else { 1.0 };
                [5.0 + bit(0), bit(1), bit(2)]
            })
            .collect();
        let indices: [u16; 36] = [
            0, 2, 1, 1, 2, 3, 4, 5, 6, 5, 7, 6, 0, 1, 4, 1, 5, 4, 2, 6, 3, 3, 6, 7, 0, 4, 2, 2,
            4, 6, 1, 3, 5, 3, 7, 5,
        ];
        let mut bin: Vec<u8> = corners
            .iter()
            .flat_map(|c| c.iter().flat_map(|v| v.to_le_bytes()))
            .collect();
        bin.extend(indices.iter().flat_map(|i| i.to_le_bytes()));

        let json = r#"{
  "asset": {"version": "2.0"},
  "scene": 0,
  "scenes": [{"nodes": [0]}],
  "nodes": [{"mesh": 0}],
  "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
  "buffers": [{"byteLength": 168}],
  "bufferViews": [
    {"buffer": 0, "byteOffset": 0, "byteLength": 96},
    {"buffer": 0, "byteOffset": 96, "byteLength": 72}
  ],
  "accessors": [
    {"bufferView": 0, "componentType": 5126, "count": 8, "type": "VEC3",
     "min": [4, -1, -1], "max": [6, 1, 1]},
    {"bufferView": 1, "componentType": 5123, "count": 36, "type": "SCALAR"}
  ]
}"#;
        glb_container(json, &bin)
    }

    fn glb_container(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut bin = bin.to_vec();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }
        let total = 12 + 8 + json.len() + 8 + bin.len();

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
        out
    }

    #[test]
    fn test_loads_binary_container() {
        let model = load_gltf_slice(&cube_glb(), None, "cube").unwrap();
        assert_eq!(model.triangle_count(), 12);
        let bounds = model.bounding_box().unwrap();
        assert_eq!(bounds.min(), Vec3::new(4.0, -1.0, -1.0));
        assert_eq!(bounds.max(), Vec3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_decodes_draco_primitives() {
        let transcoder = draco_oxide::io::gltf::GltfTranscoder::default();
        let (compressed, _warnings) = transcoder.transcode_to_glb(&cube_glb()).unwrap();

        let unchecked = gltf::Gltf::from_slice_without_validation(&compressed).unwrap();
        assert!(unchecked.extensions_required().any(|ext| ext == DRACO_EXTENSION));

        let model = load_gltf_slice(&compressed, None, "cube").unwrap();
        assert_eq!(model.triangle_count(), 12);
        let bounds = model.bounding_box().unwrap();
        assert!((bounds.min() - Vec3::new(4.0, -1.0, -1.0)).length() < 0.05);
        assert!((bounds.max() - Vec3::new(6.0, 1.0, 1.0)).length() < 0.05);
        for n in &model.meshes()[0].normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_draco_extension_without_stream_is_reported() {
        let json = r#"{
  "asset": {"version": "2.0"},
  "extensionsUsed": ["KHR_draco_mesh_compression"],
  "extensionsRequired": ["KHR_draco_mesh_compression"],
  "meshes": [{"primitives": [{"attributes": {"POSITION": 0},
    "extensions": {"KHR_draco_mesh_compression": {"attributes": {"POSITION": 0}}}}]}],
  "accessors": [{"componentType": 5126, "count": 3, "type": "VEC3"}]
}"#;
        let err = load_gltf_slice(json.as_bytes(), None, "draco").unwrap_err();
        assert!(matches!(err, LoadError::DracoPrimitive(_)));
    }

    #[test]
    fn test_optional_draco_uses_fallback_geometry() {
        let json = triangle_gltf(r#"{"mesh": 0}"#).replacen(
            "\"scene\": 0,",
            "\"scene\": 0, \"extensionsUsed\": [\"KHR_draco_mesh_compression\"],",
            1,
        );
        let model = load_gltf_slice(json.as_bytes(), None, "fallback").unwrap();
        assert_eq!(model.triangle_count(), 1);
    }

    #[test]
    fn test_required_meshopt_is_reported() {
        let json = r#"{
  "asset": {"version": "2.0"},
  "extensionsUsed": ["EXT_meshopt_compression"],
  "extensionsRequired": ["EXT_meshopt_compression"]
}"#;
        let err = load_gltf_slice(json.as_bytes(), None, "meshopt").unwrap_err();
        assert!(
            matches!(err, LoadError::CompressedPrimitive(ext) if ext == "EXT_meshopt_compression")
        );
    }

    #[test]
    fn test_document_without_meshes_is_empty() {
        let json = r#"{"asset": {"version": "2.0"}}"#;
        let err = load_gltf_slice(json.as_bytes(), None, "nothing").unwrap_err();
        assert!(matches!(err, LoadError::EmptyModel(_)));
    }

    #[test]
    fn test_garbage_is_a_gltf_error() {
        let err = load_gltf_slice(b"not a gltf", None, "junk").unwrap_err();
        assert!(matches!(err, LoadError::Gltf(_)));
    }
}
