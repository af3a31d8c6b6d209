//! Scene lighting rig.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Converts a `0xRRGGBB` color to linear RGB in [0, 1].
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Sky/ground gradient ambient light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HemisphereLight {
    /// Color received by up-facing surfaces.
    pub sky_color: Vec3,
    /// Color received by down-facing surfaces.
    pub ground_color: Vec3,
    pub intensity: f32,
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky_color: color_from_hex(0xff_ffff),
            ground_color: color_from_hex(0x44_4444),
            intensity: 1.2,
        }
    }
}

/// Light from an infinitely distant source, shining from `position` toward the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Only the direction from this point to the origin matters.
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light.
    #[must_use]
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.try_normalize().unwrap_or(Vec3::Y)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 2.0,
            position: Vec3::new(5.0, 10.0, 7.0),
        }
    }
}

/// Cone light with soft edges and distance falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Maximum range; 0 means unlimited.
    pub distance: f32,
    /// Half-angle of the cone in radians.
    pub angle: f32,
    /// Fraction of the cone that fades out, in [0, 1].
    pub penumbra: f32,
    /// Distance attenuation exponent.
    pub decay: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl SpotLight {
    /// Unit vector along the cone axis.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Y)
    }

    /// Cosines of the inner (full intensity) and outer (cutoff) cone angles.
    #[must_use]
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle.clamp(0.0, std::f32::consts::FRAC_PI_2);
        let inner = outer * (1.0 - self.penumbra.clamp(0.0, 1.0));
        (inner.cos(), outer.cos())
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 3.0,
            distance: 100.0,
            angle: std::f32::consts::PI / 6.0,
            penumbra: 0.3,
            decay: 1.0,
            position: Vec3::new(5.0, 8.0, 5.0),
            target: Vec3::ZERO,
        }
    }
}

/// The viewer's lights: one hemisphere, one directional, one spot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRig {
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
    pub spot: SpotLight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert!((color_from_hex(0xffffff) - Vec3::ONE).length() < 1e-5);
        assert_eq!(color_from_hex(0x000000), Vec3::ZERO);
        let gray = color_from_hex(0x444444);
        assert!(gray.x > 0.05 && gray.x < 0.06);
        assert_eq!(gray.x, gray.z);
    }

    #[test]
    fn test_spot_cone() {
        let spot = SpotLight::default();
        let (inner, outer) = spot.cone_cosines();
        assert!(inner > outer);
        assert!((outer - (std::f32::consts::PI / 6.0).cos()).abs() < 1e-6);
        let dir = spot.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_rig_round_trips_through_json() {
        let rig = LightRig::default();
        let json = serde_json::to_string(&rig).unwrap();
        let back: LightRig = serde_json::from_str(&json).unwrap();
        assert_eq!(rig, back);
    }
}
