//! GPU layout of the lighting rig.

use orbitview_core::LightRig;

/// Light uniforms. Layout must match `Lights` in `mesh.wgsl`; every member is
/// a vec4 so no WGSL padding rules apply.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniforms {
    /// Hemisphere sky color premultiplied by intensity.
    pub sky_color: [f32; 4],
    /// Hemisphere ground color premultiplied by intensity.
    pub ground_color: [f32; 4],
    /// Directional color premultiplied by intensity.
    pub directional_color: [f32; 4],
    /// Unit vector toward the directional light.
    pub directional_direction: [f32; 4],
    /// Spot color premultiplied by intensity; w = range (0 = unlimited).
    pub spot_color: [f32; 4],
    /// Spot position; w = decay exponent.
    pub spot_position: [f32; 4],
    /// Spot cone axis; w = cosine of the inner (full intensity) angle.
    pub spot_direction: [f32; 4],
    /// x = cosine of the outer (cutoff) angle.
    pub spot_cone: [f32; 4],
}

impl LightUniforms {
    /// Packs a light rig.
    #[must_use]
    pub fn from_rig(rig: &LightRig) -> Self {
        let hemi = &rig.hemisphere;
        let dir = &rig.directional;
        let spot = &rig.spot;
        let (inner_cos, outer_cos) = spot.cone_cosines();
        Self {
            sky_color: (hemi.sky_color * hemi.intensity).extend(0.0).to_array(),
            ground_color: (hemi.ground_color * hemi.intensity).extend(0.0).to_array(),
            directional_color: (dir.color * dir.intensity).extend(0.0).to_array(),
            directional_direction: dir.direction_to_light().extend(0.0).to_array(),
            spot_color: (spot.color * spot.intensity).extend(spot.distance).to_array(),
            spot_position: spot.position.extend(spot.decay).to_array(),
            spot_direction: spot.direction().extend(inner_cos).to_array(),
            spot_cone: [outer_cos, 0.0, 0.0, 0.0],
        }
    }
}

impl Default for LightUniforms {
    fn default() -> Self {
        Self::from_rig(&LightRig::default())
    }
}
