//! Format dispatch and background loading.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use orbitview_core::{Model, ModelSource};

use crate::error::{LoadError, LoadResult};

/// Supported model formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// glTF 2.0, JSON or binary container.
    Gltf,
    /// Wavefront OBJ.
    Obj,
    /// Stanford PLY.
    Ply,
}

impl ModelFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "glb" | "gltf" => Ok(Self::Gltf),
            "obj" => Ok(Self::Obj),
            "ply" => Ok(Self::Ply),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }
    }
}

pub(crate) fn model_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string()
}

/// Loads a model synchronously on the calling thread.
pub fn load_model(path: impl AsRef<Path>) -> LoadResult<Model> {
    let path = path.as_ref();
    let format = ModelFormat::from_path(path)?;
    if !path.exists() {
        return Err(LoadError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }

    let start = Instant::now();
    let model = match format {
        ModelFormat::Gltf => crate::gltf_loader::load_gltf(path)?,
        ModelFormat::Obj => crate::obj::load_obj(path)?,
        ModelFormat::Ply => crate::ply::load_ply(path)?,
    };
    log::info!(
        "loaded '{}' ({format:?}): {} meshes, {} triangles in {:.1?}",
        path.display(),
        model.meshes().len(),
        model.triangle_count(),
        start.elapsed()
    );
    Ok(model)
}

/// Starts model loads on worker threads.
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    base_dir: PathBuf,
}

impl AssetLoader {
    /// A loader resolving relative file names against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// A loader for the directory of a [`ModelSource`].
    pub fn from_source(source: &ModelSource) -> Self {
        Self::new(source.directory.clone())
    }

    /// Base directory of relative paths.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path of `file` under the base directory. Absolute paths are kept.
    pub fn resolve(&self, file: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(file)
    }

    /// Starts loading `file` in the background and returns immediately.
    ///
    /// The handle receives exactly one completion event.
    pub fn load(&self, file: impl AsRef<Path>) -> LoadHandle {
        let path = self.resolve(file);
        let (tx, rx) = mpsc::channel();

        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("orbitview-loader".to_string())
            .spawn(move || {
                let result = load_model(&worker_path);
                // The viewer may have gone away; nothing to report to.
                let _ = tx.send(result);
            });
        if let Err(e) = spawned {
            // The sender was dropped with the closure; the handle reports a disconnect.
            log::error!("failed to start loader thread for '{}': {e}", path.display());
        }

        log::debug!("loading '{}' in the background", path.display());
        LoadHandle {
            path,
            receiver: rx,
            finished: false,
        }
    }
}

/// A model load in progress.
#[derive(Debug)]
pub struct LoadHandle {
    path: PathBuf,
    receiver: mpsc::Receiver<LoadResult<Model>>,
    finished: bool,
}

impl LoadHandle {
    /// Path being loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the completion event was already taken.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Polls without blocking. Returns the completion event once, then `None`.
    pub fn try_complete(&mut self) -> Option<LoadResult<Model>> {
        if self.finished {
            return None;
        }
        let event = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => Err(LoadError::LoaderDisconnected),
        };
        self.finished = true;
        Some(event)
    }

    /// Blocks until the load completes.
    pub fn wait(self) -> LoadResult<Model> {
        if self.finished {
            return Err(LoadError::LoaderDisconnected);
        }
        self.receiver
            .recv()
            .unwrap_or(Err(LoadError::LoaderDisconnected))
    }
}
