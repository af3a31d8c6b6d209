//! Headless rendering API.
//!
//! Renders a framed model to an image buffer or file without opening a
//! window. Useful for thumbnails, batch processing and integration tests.

use std::path::Path;

use pollster::FutureExt;

use orbitview_core::{Model, OrbitviewError, Result, ViewerOptions};
use orbitview_render::RenderEngine;

use crate::Viewer;

/// Renders `model` framed by the auto-fit and returns tightly packed RGBA8
/// pixels (`width * height * 4` bytes, top row first).
///
/// # Example
/// ```no_run
/// use orbitview::*;
///
/// let model = orbitview::load_model("models/final1.glb").unwrap();
/// let pixels = render_to_image(&ViewerOptions::default(), model, 800, 600).unwrap();
/// assert_eq!(pixels.len(), 800 * 600 * 4);
/// ```
pub fn render_to_image(
    options: &ViewerOptions,
    model: Model,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(OrbitviewError::InvalidOption {
            name: "size",
            reason: format!("image size must be non-zero, got {width}x{height}"),
        });
    }

    let mut viewer = Viewer::new(options.clone())?;
    viewer.resize(width, height);
    viewer.apply_model(model)?;

    let mut engine = RenderEngine::new_headless(width, height, &options.renderer)
        .block_on()
        .map_err(|e| {
            OrbitviewError::RenderError(format!("failed to create headless engine: {e}"))
        })?;
    engine.update_lights(&options.lights);
    if let Some(model) = viewer.model() {
        engine.set_model(model);
    }

    engine
        .render_to_buffer(viewer.camera())
        .map_err(|e| OrbitviewError::RenderError(e.to_string()))
}

/// Renders `model` and saves it as PNG or JPEG (chosen by extension).
pub fn render_to_file(
    options: &ViewerOptions,
    model: Model,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
) -> Result<()> {
    let data = render_to_image(options, model, width, height)?;
    orbitview_render::save_image(path, &data, width, height)
        .map_err(|e| OrbitviewError::RenderError(format!("failed to save image: {e}")))
}
