//! Camera auto-fit: frames a loaded model from its bounding box.
//!
//! Given the model's bounding box and the camera's vertical field of view,
//! [`fit_camera`] produces:
//! - the translation that re-centers the model on the world origin,
//! - a camera position elevated for a three-quarter view, looking at the origin,
//! - near/far planes proportional to the model size.
//!
//! The computation is pure; the caller applies the result to its camera,
//! controls and model.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::error::{OrbitviewError, Result};

/// Default height of the camera above the model, as a fraction of the
/// model's largest dimension.
pub const DEFAULT_VERTICAL_OFFSET_RATIO: f32 = 0.6;

/// `near = max_dimension / NEAR_PLANE_DIVISOR`.
pub const NEAR_PLANE_DIVISOR: f32 = 100.0;

/// `far = max_dimension * FAR_PLANE_MULTIPLIER`.
pub const FAR_PLANE_MULTIPLIER: f32 = 100.0;

/// Models whose largest dimension is below this are treated as degenerate.
pub const MIN_FIT_DIMENSION: f32 = 1e-6;

/// A vertical field of view, guaranteed to lie within (0, pi).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct FieldOfView(f32);

impl FieldOfView {
    /// Creates a field of view from radians.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitviewError::InvalidFieldOfView`] unless `0 < radians < pi`.
    pub fn from_radians(radians: f32) -> Result<Self> {
        if radians.is_finite() && radians > 0.0 && radians < PI {
            Ok(Self(radians))
        } else {
            Err(OrbitviewError::InvalidFieldOfView(radians))
        }
    }

    /// Creates a field of view from degrees (`0 < degrees < 180`).
    pub fn from_degrees(degrees: f32) -> Result<Self> {
        // Checked in degrees too: 180.to_radians() may round below pi.
        if !(degrees > 0.0 && degrees < 180.0) {
            return Err(OrbitviewError::InvalidFieldOfView(degrees.to_radians()));
        }
        Self::from_radians(degrees.to_radians())
    }

    /// The angle in radians.
    #[must_use]
    pub fn radians(self) -> f32 {
        self.0
    }

    /// The angle in degrees.
    #[must_use]
    pub fn degrees(self) -> f32 {
        self.0.to_degrees()
    }
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self(std::f32::consts::FRAC_PI_4) // 45 degrees
    }
}

impl TryFrom<f32> for FieldOfView {
    type Error = OrbitviewError;

    fn try_from(radians: f32) -> Result<Self> {
        Self::from_radians(radians)
    }
}

impl From<FieldOfView> for f32 {
    fn from(fov: FieldOfView) -> Self {
        fov.0
    }
}

/// Tunables for [`fit_camera`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Camera height above the model as a fraction of its largest dimension.
    pub vertical_offset_ratio: f32,
    /// Multiplier on the framing distance (1.0 = largest dimension exactly
    /// fills the vertical field of view).
    pub distance_scale: f32,
    /// Size substituted for a model whose largest dimension is zero.
    pub fallback_dimension: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            vertical_offset_ratio: DEFAULT_VERTICAL_OFFSET_RATIO,
            distance_scale: 1.0,
            fallback_dimension: 1.0,
        }
    }
}

impl FitOptions {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitviewError::InvalidOption`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !self.vertical_offset_ratio.is_finite() {
            return Err(OrbitviewError::InvalidOption {
                name: "fit.vertical_offset_ratio",
                reason: format!("must be finite, got {}", self.vertical_offset_ratio),
            });
        }
        if !(self.distance_scale.is_finite() && self.distance_scale > 0.0) {
            return Err(OrbitviewError::InvalidOption {
                name: "fit.distance_scale",
                reason: format!("must be positive, got {}", self.distance_scale),
            });
        }
        if !(self.fallback_dimension.is_finite() && self.fallback_dimension >= MIN_FIT_DIMENSION) {
            return Err(OrbitviewError::InvalidOption {
                name: "fit.fallback_dimension",
                reason: format!(
                    "must be at least {MIN_FIT_DIMENSION}, got {}",
                    self.fallback_dimension
                ),
            });
        }
        Ok(())
    }
}

/// Initial camera placement produced by the auto-fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    /// Vertical field of view.
    pub vertical_fov: FieldOfView,
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
    /// Near clipping plane (always positive).
    pub near: f32,
    /// Far clipping plane (always greater than `near`).
    pub far: f32,
}

/// Full result of [`fit_camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFit {
    /// Camera placement.
    pub frame: CameraFrame,
    /// Translation to add to the model so its bounding box is centered on the origin.
    pub model_translation: Vec3,
    /// Camera distance along the view axis before elevation.
    pub distance: f32,
    /// Largest model dimension used for the computation (the fallback size when degenerate).
    pub max_dimension: f32,
    /// Whether the fallback size was substituted for a zero-sized model.
    pub degenerate: bool,
}

/// Computes the camera frame that shows the whole model.
///
/// # Errors
///
/// Returns [`OrbitviewError::InvalidOption`] if `options` fail validation.
/// [`BoundingBox`] and [`FieldOfView`] are validated when built or
/// deserialized, so an inverted box or out-of-range angle never gets here.
pub fn fit_camera(
    bounds: &BoundingBox,
    fov: FieldOfView,
    options: &FitOptions,
) -> Result<CameraFit> {
    options.validate()?;

    let center = bounds.center();
    let measured = bounds.max_dimension();

    let degenerate = measured < MIN_FIT_DIMENSION;
    let max_dimension = if degenerate {
        log::warn!(
            "degenerate model bounds (largest dimension {measured}); framing with fallback size {}",
            options.fallback_dimension
        );
        options.fallback_dimension
    } else {
        measured
    };

    let distance = framing_distance(max_dimension, fov) * options.distance_scale;
    let position = Vec3::new(0.0, max_dimension * options.vertical_offset_ratio, distance);

    let frame = CameraFrame {
        vertical_fov: fov,
        position,
        look_at: Vec3::ZERO,
        near: max_dimension / NEAR_PLANE_DIVISOR,
        far: max_dimension * FAR_PLANE_MULTIPLIER,
    };

    log::debug!(
        "fit: center {center}, max dimension {max_dimension}, distance {distance}, near {}, far {}",
        frame.near,
        frame.far
    );

    Ok(CameraFit {
        frame,
        model_translation: -center,
        distance,
        max_dimension,
        degenerate,
    })
}

/// Distance at which an object of height `extent` exactly fills the
/// vertical field of view.
#[must_use]
pub fn framing_distance(extent: f32, fov: FieldOfView) -> f32 {
    (extent / 2.0 / (fov.radians() / 2.0).tan()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_cube() -> BoundingBox {
        BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap()
    }

    fn fov45() -> FieldOfView {
        FieldOfView::from_degrees(45.0).unwrap()
    }

    #[test]
    fn test_unit_cube_at_45_degrees() {
        let fit = fit_camera(&unit_cube(), fov45(), &FitOptions::default()).unwrap();
        assert_eq!(unit_cube().size(), Vec3::splat(2.0));
        assert_eq!(fit.model_translation, Vec3::ZERO);
        assert_eq!(fit.max_dimension, 2.0);
        assert!((fit.distance - 2.414_213_5).abs() < 1e-4);
        assert!((fit.frame.position.y - 1.2).abs() < 1e-6);
        assert!((fit.frame.near - 0.02).abs() < 1e-7);
        assert!((fit.frame.far - 200.0).abs() < 1e-4);
        assert!(!fit.degenerate);
    }

    #[test]
    fn test_recentering_yields_origin() {
        let b = BoundingBox::new(Vec3::new(3.0, 5.0, -7.0), Vec3::new(5.0, 9.0, -1.0)).unwrap();
        let fit = fit_camera(&b, fov45(), &FitOptions::default()).unwrap();
        let moved = b.translated(fit.model_translation);
        assert_eq!(moved.center(), Vec3::ZERO);
        assert_eq!(fit.frame.look_at, Vec3::ZERO);
    }

    #[test]
    fn test_inverted_json_box_never_reaches_fit() {
        let parsed = serde_json::from_str::<BoundingBox>(r#"{"min":[1,1,1],"max":[0,0,0]}"#);
        assert!(parsed.is_err());
        assert!(matches!(
            BoundingBox::new(Vec3::ONE, Vec3::ZERO),
            Err(OrbitviewError::InvalidBoundingBox { .. })
        ));
    }

    #[test]
    fn test_degenerate_box_uses_fallback() {
        let b = BoundingBox::from_point(Vec3::new(2.0, 2.0, 2.0));
        let fit = fit_camera(&b, fov45(), &FitOptions::default()).unwrap();
        assert!(fit.degenerate);
        assert_eq!(fit.max_dimension, 1.0);
        assert!(fit.distance.is_finite() && fit.distance > 0.0);
        assert!(fit.frame.near.is_finite() && fit.frame.near > 0.0);
        assert!(fit.frame.far.is_finite() && fit.frame.far > fit.frame.near);
        assert_eq!(fit.model_translation, Vec3::splat(-2.0));
    }

    #[test]
    fn test_flat_model_is_not_degenerate() {
        let b = BoundingBox::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 2.0)).unwrap();
        let fit = fit_camera(&b, fov45(), &FitOptions::default()).unwrap();
        assert!(!fit.degenerate);
        assert_eq!(fit.max_dimension, 4.0);
    }

    #[test]
    fn test_distance_scale_and_offset_ratio() {
        let options = FitOptions {
            vertical_offset_ratio: 0.0,
            distance_scale: 2.0,
            ..FitOptions::default()
        };
        let base = fit_camera(&unit_cube(), fov45(), &FitOptions::default()).unwrap();
        let fit = fit_camera(&unit_cube(), fov45(), &options).unwrap();
        assert!((fit.distance - 2.0 * base.distance).abs() < 1e-5);
        assert_eq!(fit.frame.position.y, 0.0);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = FitOptions {
            fallback_dimension: 0.0,
            ..FitOptions::default()
        };
        let err = fit_camera(&unit_cube(), fov45(), &options);
        assert!(matches!(err, Err(OrbitviewError::InvalidOption { .. })));

        let options = FitOptions {
            distance_scale: -1.0,
            ..FitOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_field_of_view_bounds() {
        assert!(FieldOfView::from_radians(0.0).is_err());
        assert!(FieldOfView::from_radians(-0.5).is_err());
        assert!(FieldOfView::from_radians(PI).is_err());
        assert!(FieldOfView::from_radians(f32::NAN).is_err());
        assert!(FieldOfView::from_degrees(179.0).is_ok());
        assert!((FieldOfView::default().degrees() - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_field_of_view_serde_validates() {
        let ok: FieldOfView = serde_json::from_str("0.5").unwrap();
        assert_eq!(ok.radians(), 0.5);
        assert!(serde_json::from_str::<FieldOfView>("4.0").is_err());
    }

    fn arb_box() -> impl Strategy<Value = BoundingBox> {
        (
            prop::array::uniform3(-100.0f32..100.0),
            prop::array::uniform3(1.0f32..50.0),
        )
            .prop_map(|(min, size)| {
                let min = Vec3::from_array(min);
                BoundingBox::new(min, min + Vec3::from_array(size)).unwrap()
            })
    }

    proptest! {
        #[test]
        fn prop_near_less_than_far(b in arb_box(), deg in 1.0f32..170.0) {
            let fov = FieldOfView::from_degrees(deg).unwrap();
            let fit = fit_camera(&b, fov, &FitOptions::default()).unwrap();
            prop_assert!(fit.frame.near > 0.0);
            prop_assert!(fit.frame.near < fit.frame.far);
        }

        #[test]
        fn prop_recentering_is_exact(
            min in prop::array::uniform3(-1.0e4f32..1.0e4),
            size in prop::array::uniform3(0.0f32..1.0e4),
        ) {
            let min = Vec3::from_array(min);
            let b = BoundingBox::new(min, min + Vec3::from_array(size)).unwrap();
            let fit = fit_camera(&b, FieldOfView::default(), &FitOptions::default()).unwrap();
            prop_assert_eq!(b.translated(fit.model_translation).center(), Vec3::ZERO);
        }

        #[test]
        fn prop_look_at_is_origin(b in arb_box()) {
            let fit = fit_camera(&b, FieldOfView::default(), &FitOptions::default()).unwrap();
            prop_assert_eq!(fit.frame.look_at, Vec3::ZERO);
            prop_assert_eq!(fit.frame.position.x, 0.0);
        }

        #[test]
        fn prop_uniform_scale_is_linear(b in arb_box(), k in 0.1f32..10.0) {
            let fov = FieldOfView::default();
            let base = fit_camera(&b, fov, &FitOptions::default()).unwrap();
            let scaled = fit_camera(&b.scaled(k), fov, &FitOptions::default()).unwrap();
            let close = |a: f32, e: f32| (a - e).abs() <= e.abs() * 1e-3;
            prop_assert!(close(scaled.distance, base.distance * k));
            prop_assert!(close(scaled.frame.near, base.frame.near * k));
            prop_assert!(close(scaled.frame.far, base.frame.far * k));
        }
    }
}
