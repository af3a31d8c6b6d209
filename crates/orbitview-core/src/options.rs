//! Configuration options for the viewer.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{OrbitviewError, Result};
use crate::fit::{FieldOfView, FitOptions};
use crate::lighting::LightRig;

/// All viewer settings. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    pub window: WindowOptions,
    pub camera: CameraOptions,
    pub fit: FitOptions,
    pub controls: ControlsOptions,
    pub renderer: RendererOptions,
    pub lights: LightRig,
    pub model: ModelSource,
}

impl ViewerOptions {
    /// Parses options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::info!("loaded viewer options from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Serializes the options as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the options describe a usable viewer.
    ///
    /// An invalid field of view is a setup error and is reported here,
    /// before any window or model exists.
    pub fn validate(&self) -> Result<()> {
        self.camera.fov()?;
        if !(self.camera.near.is_finite() && self.camera.near > 0.0) {
            return Err(OrbitviewError::InvalidOption {
                name: "camera.near",
                reason: format!("must be positive, got {}", self.camera.near),
            });
        }
        if !(self.camera.far.is_finite() && self.camera.far > self.camera.near) {
            return Err(OrbitviewError::InvalidOption {
                name: "camera.far",
                reason: format!("must exceed near ({}), got {}", self.camera.near, self.camera.far),
            });
        }
        self.fit.validate()?;
        self.controls.validate()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(OrbitviewError::InvalidOption {
                name: "window",
                reason: format!(
                    "size must be non-zero, got {}x{}",
                    self.window.width, self.window.height
                ),
            });
        }
        if !matches!(self.renderer.msaa_samples, 1 | 4) {
            return Err(OrbitviewError::InvalidOption {
                name: "renderer.msaa_samples",
                reason: format!("must be 1 or 4, got {}", self.renderer.msaa_samples),
            });
        }
        Ok(())
    }
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "orbitview".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Perspective camera settings used before a model is framed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl CameraOptions {
    /// The validated field of view.
    pub fn fov(&self) -> Result<FieldOfView> {
        FieldOfView::from_degrees(self.fov_degrees)
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
        }
    }
}

/// Orbit controls behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsOptions {
    /// Apply input gradually over several frames.
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update, in (0, 1].
    pub damping_factor: f32,
    /// Spin around the target when idle.
    pub auto_rotate: bool,
    /// 1.0 = one full turn per minute.
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl ControlsOptions {
    fn validate(&self) -> Result<()> {
        let finite = [
            ("controls.auto_rotate_speed", self.auto_rotate_speed),
            ("controls.rotate_speed", self.rotate_speed),
            ("controls.zoom_speed", self.zoom_speed),
            ("controls.pan_speed", self.pan_speed),
            ("controls.min_distance", self.min_distance),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(OrbitviewError::InvalidOption {
                    name,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(OrbitviewError::InvalidOption {
                name: "controls.damping_factor",
                reason: format!("must be within (0, 1], got {}", self.damping_factor),
            });
        }
        if !(self.min_distance >= 0.0 && self.max_distance > self.min_distance) {
            return Err(OrbitviewError::InvalidOption {
                name: "controls.max_distance",
                reason: format!(
                    "distance range [{}, {}] is empty",
                    self.min_distance, self.max_distance
                ),
            });
        }
        Ok(())
    }
}

impl Default for ControlsOptions {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate: true,
            auto_rotate_speed: 1.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::MAX,
        }
    }
}

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    /// Multisample count: 1 (off) or 4.
    pub msaa_samples: u32,
    /// Clear to a transparent background instead of `background_color`.
    pub transparent_background: bool,
    pub background_color: Vec3,
}

impl RendererOptions {
    /// Clear color as RGBA.
    #[must_use]
    pub fn clear_color(&self) -> [f64; 4] {
        let c = self.background_color;
        if self.transparent_background {
            [0.0, 0.0, 0.0, 0.0]
        } else {
            [f64::from(c.x), f64::from(c.y), f64::from(c.z), 1.0]
        }
    }
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            msaa_samples: 4,
            transparent_background: true,
            background_color: Vec3::new(0.1, 0.1, 0.1),
        }
    }
}

/// Where the model asset lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSource {
    /// Base directory prepended to `file`.
    pub directory: PathBuf,
    pub file: String,
}

impl ModelSource {
    /// Full path of the asset.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file)
    }
}

impl Default for ModelSource {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("models"),
            file: "final1.glb".to_string(),
        }
    }
}
