//! Orbit controls: rotate, zoom and pan a camera around a target point.
//!
//! Input methods only accumulate pending motion; [`OrbitControls::update`]
//! applies it to the camera once per frame. With damping enabled, each
//! update applies a fraction of the pending motion and decays the rest, so
//! the camera keeps gliding after the input stops.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

use orbitview_core::{CameraFrame, ControlsOptions};

use crate::camera::Camera;

/// Keeps the polar angle away from the poles, where the view basis flips.
const POLAR_EPSILON: f32 = 1e-6;

/// Motion below this (squared) is not reported as a camera change.
const CHANGE_EPSILON: f32 = 1e-10;

/// Zoom factor per wheel step at `zoom_speed` 1.
const ZOOM_STEP: f32 = 0.95;

/// Closest the camera may get to the target, whatever `min_distance` says.
/// At radius zero the orbit angles are lost for good.
const MIN_RADIUS: f32 = 1e-4;

/// Spherical orbit controller in the style of three.js `OrbitControls`.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits around.
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Lower bound of the polar angle (0 = looking straight down).
    pub min_polar_angle: f32,
    /// Upper bound of the polar angle (pi = looking straight up).
    pub max_polar_angle: f32,
    /// Pending azimuth change (radians).
    delta_theta: f32,
    /// Pending polar change (radians).
    delta_phi: f32,
    /// Pending radius multiplier.
    scale: f32,
    /// Pending target translation.
    pan_offset: Vec3,
}

impl OrbitControls {
    /// Creates controls orbiting `target`.
    #[must_use]
    pub fn new(options: &ControlsOptions, target: Vec3) -> Self {
        Self {
            target,
            enable_damping: options.enable_damping,
            damping_factor: options.damping_factor,
            auto_rotate: options.auto_rotate,
            auto_rotate_speed: options.auto_rotate_speed,
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
            pan_speed: options.pan_speed,
            min_distance: options.min_distance,
            max_distance: options.max_distance,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Re-targets the controls at a fitted frame and drops pending motion.
    pub fn reset_to(&mut self, frame: &CameraFrame) {
        self.target = frame.look_at;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }

    /// Whether motion is still pending (damping has not settled).
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > 1e-6
            || self.delta_phi.abs() > 1e-6
            || (self.scale - 1.0).abs() > 1e-6
            || self.pan_offset.length_squared() > CHANGE_EPSILON
    }

    /// Rotates the camera around the up axis (positive = camera moves left).
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Rotates the camera toward the top pole (positive = camera moves up).
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Rotates from a mouse drag in pixels; a drag across the full viewport
    /// height is one full turn.
    #[allow(clippy::cast_precision_loss)]
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: u32) {
        let height = viewport_height.max(1) as f32;
        self.rotate_left(TAU * dx / height * self.rotate_speed);
        self.rotate_up(TAU * dy / height * self.rotate_speed);
    }

    /// Zooms from mouse wheel steps (positive = toward the target).
    pub fn zoom(&mut self, steps: f32) {
        let factor = ZOOM_STEP.powf(self.zoom_speed * steps.abs());
        if steps > 0.0 {
            self.dolly_in(factor);
        } else if steps < 0.0 {
            self.dolly_out(factor);
        }
    }

    /// Moves toward the target: the distance is multiplied by `factor` (< 1).
    pub fn dolly_in(&mut self, factor: f32) {
        self.scale *= factor;
    }

    /// Moves away from the target: the distance is divided by `factor` (< 1).
    pub fn dolly_out(&mut self, factor: f32) {
        self.scale /= factor;
    }

    /// Pans from a mouse drag in pixels, so the point under the cursor
    /// follows it at the target's depth.
    #[allow(clippy::cast_precision_loss)]
    pub fn pan_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: u32, camera: &Camera) {
        let height = viewport_height.max(1) as f32;
        let target_distance = camera.position.distance(self.target) * (camera.fov / 2.0).tan();
        let right = camera.right();
        let up = right.cross(camera.forward());
        let world_per_pixel = 2.0 * target_distance / height * self.pan_speed;
        self.pan_offset += -right * dx * world_per_pixel + up * dy * world_per_pixel;
    }

    /// Azimuth advanced by auto-rotation over `dt` seconds.
    #[must_use]
    pub fn auto_rotation_angle(&self, dt: f32) -> f32 {
        TAU / 60.0 * self.auto_rotate_speed * dt
    }

    /// Applies pending motion to the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) -> bool {
        // Work in a frame where the camera's up vector is +Y.
        let up = camera.up.try_normalize().unwrap_or(Vec3::Y);
        let to_y_up = Quat::from_rotation_arc(up, Vec3::Y);
        let from_y_up = to_y_up.inverse();

        let offset = to_y_up * (camera.position - self.target);
        let radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        if self.auto_rotate {
            self.rotate_left(self.auto_rotation_angle(dt));
        }

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * step;
        phi += self.delta_phi * step;

        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let new_radius = (radius * self.scale)
            .clamp(self.min_distance, self.max_distance)
            .max(MIN_RADIUS);

        self.target += self.pan_offset * step;

        let new_offset = Vec3::new(
            new_radius * phi.sin() * theta.sin(),
            new_radius * phi.cos(),
            new_radius * phi.sin() * theta.cos(),
        );
        let old_position = camera.position;
        let old_target = camera.target;
        camera.position = self.target + from_y_up * new_offset;
        camera.target = self.target;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        old_position.distance_squared(camera.position) > CHANGE_EPSILON
            || old_target.distance_squared(camera.target) > CHANGE_EPSILON
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(&ControlsOptions::default(), Vec3::ZERO)
    }
}
