//! Viewer state: options, camera, orbit controls and the loaded model.

use orbitview_assets::LoadError;
use orbitview_core::{
    fit_camera, CameraFit, FieldOfView, Model, OrbitviewError, Result, ViewerOptions,
};
use orbitview_render::{Camera, OrbitControls};

/// A model viewer without a window.
///
/// Owns everything that reacts to a model load. The window loop and the
/// headless renderer both drive one of these; several can coexist.
#[derive(Debug, Clone)]
pub struct Viewer {
    options: ViewerOptions,
    fov: FieldOfView,
    camera: Camera,
    controls: OrbitControls,
    model: Option<Model>,
    fit: Option<CameraFit>,
    viewport: (u32, u32),
}

impl Viewer {
    /// Creates a viewer. Invalid options (including the field of view) are
    /// reported here, before any window or model exists.
    pub fn new(options: ViewerOptions) -> Result<Self> {
        options.validate()?;
        let fov = options.camera.fov()?;
        let viewport = (options.window.width, options.window.height);

        let mut camera = Camera::from_options(&options.camera, 1.0);
        camera.set_viewport(viewport.0, viewport.1);
        let controls = OrbitControls::new(&options.controls, camera.target);

        log::debug!(
            "viewer created: fov {:.1} deg, viewport {}x{}",
            fov.degrees(),
            viewport.0,
            viewport.1
        );

        Ok(Self {
            options,
            fov,
            camera,
            controls,
            model: None,
            fit: None,
            viewport,
        })
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// The displayed model, re-centered on the origin.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// The fit computed for the displayed model.
    pub fn fit(&self) -> Option<&CameraFit> {
        self.fit.as_ref()
    }

    /// Current viewport size in physical pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Reacts to the completion event of a model load.
    ///
    /// On success the model is framed (see [`Viewer::apply_model`]). A
    /// failure is logged and the viewer keeps running with what it had.
    /// Returns whether a new model is now displayed.
    pub fn handle_load_result(&mut self, result: std::result::Result<Model, LoadError>) -> bool {
        match result {
            Ok(model) => match self.apply_model(model) {
                Ok(_) => true,
                Err(e) => {
                    log::error!("cannot display model: {e}");
                    false
                }
            },
            Err(e) => {
                log::error!("failed to load model: {e}");
                false
            }
        }
    }

    /// Frames a model: fits the camera to its bounds, moves the model so
    /// its center sits at the origin, points the camera and the orbit
    /// controls at the origin.
    pub fn apply_model(&mut self, mut model: Model) -> Result<&CameraFit> {
        let bounds = model.bounding_box().ok_or_else(|| {
            OrbitviewError::InvalidModel(format!("model '{}' has no vertices", model.name()))
        })?;

        let fit = fit_camera(&bounds, self.fov, &self.options.fit)?;
        model.translate(fit.model_translation);
        self.camera.apply_frame(&fit.frame);
        self.controls.reset_to(&fit.frame);

        log::info!(
            "framed '{}': size {:?}, distance {:.3}, near {:.4}, far {:.1}",
            model.name(),
            bounds.size(),
            fit.distance,
            fit.frame.near,
            fit.frame.far
        );

        self.model = Some(model);
        Ok(self.fit.insert(fit))
    }

    /// Updates the projection for a new viewport size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.camera.set_viewport(width, height);
    }

    /// Orbits from a mouse drag in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.controls.rotate_by_pixels(dx, dy, self.viewport.1);
    }

    /// Pans from a mouse drag in pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.controls
            .pan_by_pixels(dx, dy, self.viewport.1, &self.camera);
    }

    /// Zooms by mouse wheel steps (positive = closer).
    pub fn zoom(&mut self, steps: f32) {
        self.controls.zoom(steps);
    }

    /// Advances the controls by `dt` seconds. Returns whether the camera moved.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.controls.update(&mut self.camera, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbitview_core::{Mesh, Vec3};

    fn still_options() -> ViewerOptions {
        let mut options = ViewerOptions::default();
        options.controls.auto_rotate = false;
        options
    }

    fn unit_cube_at(center: Vec3) -> Model {
        let positions = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ]
        .iter()
        .map(|p| *p + center)
        .collect();
        let mesh = Mesh::new(positions, None, vec![0, 1, 2, 0, 2, 3]).unwrap();
        Model::new("cube", vec![mesh])
    }

    #[test]
    fn test_new_rejects_bad_fov() {
        let mut options = ViewerOptions::default();
        options.camera.fov_degrees = 200.0;
        assert!(matches!(
            Viewer::new(options),
            Err(OrbitviewError::InvalidFieldOfView(_))
        ));
    }

    #[test]
    fn test_new_sets_aspect_from_window() {
        let viewer = Viewer::new(ViewerOptions::default()).unwrap();
        assert!((viewer.camera().aspect_ratio - 1280.0 / 720.0).abs() < 1e-6);
        assert!(viewer.model().is_none());
    }

    #[test]
    fn test_apply_model_frames_and_recenters() {
        let mut viewer = Viewer::new(still_options()).unwrap();
        let fit = *viewer.apply_model(unit_cube_at(Vec3::new(5.0, 0.0, 0.0))).unwrap();

        assert_eq!(fit.model_translation, Vec3::new(-5.0, 0.0, 0.0));
        assert!((fit.distance - 2.414_213_6).abs() < 1e-4);

        let bounds = viewer.model().unwrap().bounding_box().unwrap();
        assert_eq!(bounds.center(), Vec3::ZERO);

        let camera = viewer.camera();
        assert_eq!(camera.target, Vec3::ZERO);
        assert!((camera.position - Vec3::new(0.0, 1.2, fit.distance)).length() < 1e-5);
        assert!((camera.near - 0.02).abs() < 1e-6);
        assert!((camera.far - 200.0).abs() < 1e-3);
        assert_eq!(viewer.controls().target, Vec3::ZERO);
    }

    #[test]
    fn test_failed_load_keeps_running() {
        let mut viewer = Viewer::new(still_options()).unwrap();
        let position = viewer.camera().position;
        let shown = viewer.handle_load_result(Err(LoadError::EmptyModel("x".into())));
        assert!(!shown);
        assert!(viewer.model().is_none());
        assert_eq!(viewer.camera().position, position);
        viewer.tick(0.016);
    }

    #[test]
    fn test_model_without_vertices_is_not_shown() {
        let mut viewer = Viewer::new(still_options()).unwrap();
        assert!(!viewer.handle_load_result(Ok(Model::new("empty", Vec::new()))));
        assert!(viewer.fit().is_none());
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut viewer = Viewer::new(still_options()).unwrap();
        viewer.resize(0, 100);
        assert_eq!(viewer.viewport(), (1280, 720));
        viewer.resize(400, 400);
        assert_eq!(viewer.viewport(), (400, 400));
        assert!((viewer.camera().aspect_ratio - 1.0).abs() < 1e-6);
    }
}
