//! Model loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a model file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The glTF document or its buffers are malformed.
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    /// The OBJ file is malformed.
    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    /// The PLY file is malformed or lacks the required elements.
    #[error("PLY error: {0}")]
    Ply(String),

    /// No loader handles this file extension.
    #[error("unsupported model format '{0}' (expected glb, gltf, obj or ply)")]
    UnsupportedFormat(String),

    /// The file decoded but contains no triangles.
    #[error("model '{0}' contains no triangles")]
    EmptyModel(String),

    /// A Draco stream failed to decode.
    #[error("Draco decode error: {0}")]
    Draco(#[from] draco_oxide::decode::Err),

    /// A Draco-compressed primitive whose extension data is unusable.
    #[error("invalid Draco primitive: {0}")]
    DracoPrimitive(String),

    /// The asset requires a mesh compression extension that cannot be decoded.
    #[error("model uses compressed geometry ({0}), which is not supported")]
    CompressedPrimitive(String),

    /// The loader thread ended without reporting a result.
    #[error("model loader stopped before reporting a result")]
    LoaderDisconnected,

    /// Decoded geometry failed validation.
    #[error(transparent)]
    Invalid(#[from] orbitview_core::OrbitviewError),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for loaders.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
