//! Loaded model data: triangle meshes under a single translatable node.

use glam::{Mat4, Vec3, Vec4};

use crate::bounds::BoundingBox;
use crate::error::{OrbitviewError, Result};

/// A triangle mesh in model space.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals (same length as `positions`).
    pub normals: Vec<Vec3>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
    /// Base color (linear RGBA).
    pub base_color: Vec4,
}

impl Mesh {
    /// Creates a mesh, computing normals when none are given.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitviewError::InvalidModel`] if the index count is not a
    /// multiple of three, an index is out of range, or the normal count does
    /// not match the vertex count.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        indices: Vec<u32>,
    ) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(OrbitviewError::InvalidModel(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(OrbitviewError::InvalidModel(format!(
                "index {bad} out of range for {} vertices",
                positions.len()
            )));
        }
        let normals = match normals {
            Some(n) if n.len() == positions.len() => n,
            Some(n) => {
                return Err(OrbitviewError::InvalidModel(format!(
                    "{} normals for {} vertices",
                    n.len(),
                    positions.len()
                )))
            }
            None => compute_vertex_normals(&positions, &indices),
        };
        Ok(Self {
            positions,
            normals,
            indices,
            base_color: Vec4::new(0.8, 0.8, 0.8, 1.0),
        })
    }

    /// Sets the base color.
    #[must_use]
    pub fn with_base_color(mut self, color: Vec4) -> Self {
        self.base_color = color;
        self
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounds of the vertex positions, if any are finite.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions.iter().copied())
    }

    /// Bakes an affine transform into positions and normals.
    pub fn transform(&mut self, matrix: &Mat4) {
        let normal_matrix = matrix.inverse().transpose();
        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        for n in &mut self.normals {
            *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
        }
        // Mirroring transforms flip winding.
        if matrix.determinant() < 0.0 {
            for tri in self.indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
    }
}

/// Area-weighted vertex normals.
#[must_use]
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        // Unnormalized cross product is proportional to triangle area.
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

/// A loaded model: a named node holding meshes and a translation offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    meshes: Vec<Mesh>,
    /// Offset applied to every mesh when placing the model in the world.
    pub translation: Vec3,
}

impl Model {
    /// Creates a model at the origin.
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
            translation: Vec3::ZERO,
        }
    }

    /// Model name (usually the asset file name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The meshes, in model space.
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Whether the model has no drawable triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(|m| m.indices.is_empty())
    }

    /// Total triangle count.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// Model-to-world transform.
    #[must_use]
    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }

    /// World-space bounding box (mesh bounds offset by the translation).
    ///
    /// Returns `None` for a model without vertices.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.meshes
            .iter()
            .filter_map(Mesh::bounding_box)
            .reduce(|a, b| a.union(&b))
            .map(|b| b.translated(self.translation))
    }

    /// Moves the model by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.translation += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None, vec![0, 1, 2]).unwrap()
    }

    #[test]
    fn test_computed_normals_face_up_z() {
        let mesh = triangle();
        for n in &mesh.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_mesh_validation() {
        assert!(Mesh::new(vec![Vec3::ZERO], None, vec![0, 0]).is_err());
        assert!(Mesh::new(vec![Vec3::ZERO], None, vec![0, 0, 1]).is_err());
        assert!(Mesh::new(vec![Vec3::ZERO], Some(vec![]), vec![0, 0, 0]).is_err());
    }

    #[test]
    fn test_model_bounds_follow_translation() {
        let mut model = Model::new("tri", vec![triangle()]);
        let before = model.bounding_box().unwrap();
        assert_eq!(before.max(), Vec3::new(1.0, 1.0, 0.0));

        model.translate(Vec3::new(-0.5, -0.5, 0.0));
        let after = model.bounding_box().unwrap();
        assert_eq!(after.center(), Vec3::ZERO);
        assert_eq!(model.triangle_count(), 1);
    }

    #[test]
    fn test_empty_model_has_no_bounds() {
        let model = Model::new("empty", vec![]);
        assert!(model.bounding_box().is_none());
        assert!(model.is_empty());
    }

    #[test]
    fn test_mirror_transform_flips_winding() {
        let mut mesh = triangle();
        mesh.transform(&Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0)));
        assert_eq!(mesh.indices, vec![0, 2, 1]);
        assert!((mesh.normals[0] - Vec3::NEG_Z).length() < 1e-6);
    }
}
