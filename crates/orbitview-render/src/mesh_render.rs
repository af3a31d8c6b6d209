//! Model GPU rendering resources.

use glam::Mat4;

use orbitview_core::{Mesh, Model};

use crate::buffer::{create_index_buffer, create_uniform_buffer, create_vertex_buffer};

/// Interleaved vertex as consumed by `mesh.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout for the mesh pipeline.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Interleaves a mesh's positions and normals.
    #[must_use]
    pub fn interleave(mesh: &Mesh) -> Vec<Self> {
        mesh.positions
            .iter()
            .zip(&mesh.normals)
            .map(|(p, n)| Self {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }
}

/// Per-mesh uniforms. Layout must match `ModelUniforms` in `mesh.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`, for normals.
    pub normal_matrix: [[f32; 4]; 4],
    pub base_color: [f32; 4],
}

impl ModelUniforms {
    /// Uniforms for a mesh under the given model transform.
    #[must_use]
    pub fn new(transform: Mat4, mesh: &Mesh) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            normal_matrix: transform.inverse().transpose().to_cols_array_2d(),
            base_color: mesh.base_color.to_array(),
        }
    }
}

/// GPU resources for one mesh.
pub struct MeshRenderData {
    /// Interleaved position/normal buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle list indices.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub num_indices: u32,
    /// Model transform and material.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group for `uniform_buffer` (group 1).
    pub bind_group: wgpu::BindGroup,
}

/// GPU resources for a whole model.
pub struct ModelRenderData {
    /// One entry per non-empty mesh.
    pub meshes: Vec<MeshRenderData>,
}

impl ModelRenderData {
    /// Uploads every non-empty mesh of `model`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        model: &Model,
    ) -> Self {
        let transform = model.world_transform();
        let meshes = model
            .meshes()
            .iter()
            .filter(|mesh| !mesh.indices.is_empty())
            .enumerate()
            .map(|(i, mesh)| {
                let label = format!("{} mesh {i}", model.name());
                let vertices = MeshVertex::interleave(mesh);
                let vertex_buffer = create_vertex_buffer(device, &vertices, Some(&label));
                let index_buffer = create_index_buffer(device, &mesh.indices, Some(&label));
                let uniforms = ModelUniforms::new(transform, mesh);
                let uniform_buffer = create_uniform_buffer(device, &uniforms, Some(&label));
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&label),
                    layout: bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });
                MeshRenderData {
                    vertex_buffer,
                    index_buffer,
                    num_indices: mesh.indices.len() as u32,
                    uniform_buffer,
                    bind_group,
                }
            })
            .collect();

        Self { meshes }
    }

    /// Records draw calls. The caller binds the pipeline and group 0.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        for mesh in &self.meshes {
            render_pass.set_bind_group(1, &mesh.bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
        assert_eq!(MeshVertex::layout().array_stride, 24);
        assert_eq!(std::mem::size_of::<ModelUniforms>(), 144);
    }

    #[test]
    fn test_interleave() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None, vec![0, 1, 2]).unwrap();
        let vertices = MeshVertex::interleave(&mesh);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_model_uniforms_translation() {
        let mesh = Mesh::new(vec![Vec3::ZERO], None, vec![]).unwrap();
        let u = ModelUniforms::new(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)), &mesh);
        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.base_color, mesh.base_color.to_array());
    }
}
