//! Error types for orbitview.

use glam::Vec3;
use thiserror::Error;

/// The main error type for orbitview operations.
#[derive(Error, Debug)]
pub enum OrbitviewError {
    /// A bounding box with `max < min` on some axis, or a non-finite corner.
    #[error("invalid bounding box: min {min}, max {max}")]
    InvalidBoundingBox { min: Vec3, max: Vec3 },

    /// A vertical field of view outside the open interval (0, pi).
    #[error("invalid vertical field of view: {0} rad (must be within (0, pi))")]
    InvalidFieldOfView(f32),

    /// A configuration value that cannot be used.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// Model data that cannot be displayed.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Loading the model asset failed.
    #[error("load error: {0}")]
    LoadError(String),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for orbitview operations.
pub type Result<T> = std::result::Result<T, OrbitviewError>;
