//! Rendering backend for orbitview.
//!
//! This crate provides the wgpu-based rendering engine, including:
//! - GPU resource management (buffers, uniforms, pipelines)
//! - The lit mesh shader (WGSL)
//! - The perspective [`Camera`] and [`OrbitControls`]
//! - Frame readback and image saving

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel and index counts are u32 by wgpu convention
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod camera;
pub mod controls;
pub mod engine;
pub mod error;
pub mod lights;
pub mod mesh_render;
pub mod screenshot;

pub use camera::Camera;
pub use controls::OrbitControls;
pub use engine::{CameraUniforms, RenderEngine, DEPTH_FORMAT, HEADLESS_FORMAT};
pub use error::{RenderError, RenderResult};
pub use lights::LightUniforms;
pub use mesh_render::{MeshRenderData, MeshVertex, ModelRenderData, ModelUniforms};
pub use screenshot::{encode_png, save_image, ScreenshotError};
