//! Model loading for orbitview.
//!
//! Decodes glTF/GLB, OBJ and PLY files into [`orbitview_core::Model`]s.
//! [`AssetLoader::load`] runs the decoder on a worker thread and hands back
//! a [`LoadHandle`] that yields exactly one completion event.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
// Vertex counts and PLY scalars are converted to f32/u32 by format
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod gltf_loader;
pub mod loader;
pub mod obj;
pub mod ply;

pub use error::{LoadError, LoadResult};
pub use gltf_loader::{load_gltf, load_gltf_slice, DRACO_EXTENSION};
pub use loader::{load_model, AssetLoader, LoadHandle, ModelFormat};
pub use obj::load_obj;
pub use ply::{load_ply, read_ply};
