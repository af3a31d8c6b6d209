//! Core abstractions for orbitview.
//!
//! This crate provides the renderer-independent pieces of the viewer:
//! - [`BoundingBox`] and the camera auto-fit calculator ([`fit_camera`])
//! - [`Model`] / [`Mesh`] data produced by the asset loaders
//! - The [`LightRig`] description
//! - [`ViewerOptions`] configuration (serde, JSON)

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Mesh indices are u32 by format; vertex counts stay far below u32::MAX
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod bounds;
pub mod error;
pub mod fit;
pub mod lighting;
pub mod model;
pub mod options;

pub use bounds::BoundingBox;
pub use error::{OrbitviewError, Result};
pub use fit::{fit_camera, CameraFit, CameraFrame, FieldOfView, FitOptions};
pub use lighting::{DirectionalLight, HemisphereLight, LightRig, SpotLight};
pub use model::{Mesh, Model};
pub use options::{
    CameraOptions, ControlsOptions, ModelSource, RendererOptions, ViewerOptions, WindowOptions,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
