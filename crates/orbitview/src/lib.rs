//! orbitview: a 3D model viewer that frames whatever it loads.
//!
//! The viewer loads a glTF/GLB, OBJ or PLY model in the background, then
//! fits the camera to the model's bounding box: the model is moved so its
//! center sits at the origin, and the camera is placed far enough back to
//! show all of it, slightly above, with clip planes scaled to its size.
//! Orbit controls take over from there.
//!
//! # Quick Start
//!
//! ```no_run
//! use orbitview::*;
//!
//! fn main() -> Result<()> {
//!     let mut options = ViewerOptions::default();
//!     options.model.file = "duck.glb".into();
//!
//!     // Blocks until the window is closed.
//!     show(options)
//! }
//! ```
//!
//! The camera fit itself is a pure function, usable without a window:
//!
//! ```
//! use orbitview::*;
//!
//! let bounds = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
//! let fit = fit_camera(&bounds, FieldOfView::default(), &FitOptions::default()).unwrap();
//! assert!((fit.distance - 2.414).abs() < 1e-3);
//! assert_eq!(fit.frame.look_at, Vec3::ZERO);
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

mod app;
mod headless;
mod viewer;

// Re-export core types
pub use orbitview_core::{
    fit::framing_distance, fit_camera, BoundingBox, CameraFit, CameraFrame, CameraOptions,
    ControlsOptions, DirectionalLight, FieldOfView, FitOptions, HemisphereLight, LightRig, Mat4,
    Mesh, Model, ModelSource, OrbitviewError, RendererOptions, Result, SpotLight, Vec2, Vec3,
    Vec4, ViewerOptions, WindowOptions,
};

// Re-export render types
pub use orbitview_render::{Camera, OrbitControls, RenderEngine, RenderError};

// Re-export loading
pub use orbitview_assets::{load_model, AssetLoader, LoadError, LoadHandle, ModelFormat};

pub use headless::{render_to_file, render_to_image};
pub use viewer::Viewer;

/// Opens the viewer window, loads the configured model and runs until the
/// window is closed or Escape is pressed.
///
/// Invalid options (such as a field of view outside (0, 180) degrees) are
/// returned before any window is created.
pub fn show(options: ViewerOptions) -> Result<()> {
    let _ = env_logger::try_init();
    let viewer = Viewer::new(options)?;
    log::info!("orbitview starting");
    app::run_app(viewer)
}
