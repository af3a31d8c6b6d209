//! Application window and event loop management.

mod input;

use std::sync::Arc;
use std::time::Instant;

use pollster::FutureExt;
use winit::{
    dpi::LogicalSize,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use orbitview_assets::{AssetLoader, LoadHandle};
use orbitview_core::{OrbitviewError, Result};
use orbitview_render::{RenderEngine, RenderError};

use crate::Viewer;

/// The windowed application state.
pub struct App {
    viewer: Viewer,
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    load: Option<LoadHandle>,
    close_requested: bool,
    /// Error that ended the loop early, reported by [`run_app`].
    fatal: Option<OrbitviewError>,
    // Mouse state for camera control; no position until the cursor is seen
    mouse_pos: Option<(f64, f64)>,
    left_mouse_down: bool,
    right_mouse_down: bool,
    shift_down: bool,
    last_frame_time: Option<Instant>,
}

impl App {
    /// Creates the application around a configured viewer.
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            window: None,
            engine: None,
            load: None,
            close_requested: false,
            fatal: None,
            mouse_pos: None,
            left_mouse_down: false,
            right_mouse_down: false,
            shift_down: false,
            last_frame_time: None,
        }
    }

    /// Creates the window and the render engine, and starts the model load.
    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let options = self.viewer.options();
        let window_attributes = Window::default_attributes()
            .with_title(options.window.title.clone())
            .with_inner_size(LogicalSize::new(options.window.width, options.window.height))
            .with_transparent(options.renderer.transparent_background);

        let window = Arc::new(event_loop.create_window(window_attributes).map_err(|e| {
            OrbitviewError::RenderError(format!("failed to create window: {e}"))
        })?);

        let engine = RenderEngine::new_windowed(window.clone(), &options.renderer)
            .block_on()
            .map_err(|e| OrbitviewError::RenderError(e.to_string()))?;
        engine.update_lights(&options.lights);

        let source = &options.model;
        let load = AssetLoader::from_source(source).load(&source.file);
        log::info!("loading model from {}", load.path().display());

        let (width, height) = engine.dimensions();
        self.viewer.resize(width, height);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        self.load = Some(load);
        Ok(())
    }

    /// Hands a finished load to the viewer and uploads the framed model.
    fn poll_load(&mut self) {
        let Some(event) = self.load.as_mut().and_then(LoadHandle::try_complete) else {
            return;
        };
        self.load = None;

        if self.viewer.handle_load_result(event) {
            if let (Some(engine), Some(model)) = (&mut self.engine, self.viewer.model()) {
                engine.set_model(model);
            }
        }
    }

    /// Advances the controls and draws one frame.
    fn render(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_frame_time
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame_time = Some(now);

        self.poll_load();
        self.viewer.tick(dt);

        let Some(engine) = &mut self.engine else {
            return;
        };
        match engine.render(self.viewer.camera()) {
            Ok(()) => {}
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory; closing viewer");
                self.fatal = Some(OrbitviewError::RenderError(
                    RenderError::OutOfMemory.to_string(),
                ));
                self.close_requested = true;
            }
            Err(e) => log::warn!("frame skipped: {e}"),
        }
    }
}

/// Runs the viewer until its window is closed.
pub fn run_app(viewer: Viewer) -> Result<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| OrbitviewError::RenderError(format!("failed to create event loop: {e}")))?;
    let mut app = App::new(viewer);

    event_loop
        .run_app(&mut app)
        .map_err(|e| OrbitviewError::RenderError(format!("event loop error: {e}")))?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
