//! Scene lighting: one ambient term plus one shadow-casting point light

use cgmath::{Matrix4, Point3, Rad, Vector3};

use crate::gfx::{camera::orbit_camera::OPENGL_TO_WGPU_MATRIX, color::hex_to_linear};

/// Uniform light applied to every surface regardless of orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB
    pub color: [f32; 3],
    pub intensity: f32,
}

impl AmbientLight {
    pub fn from_hex(hex: u32, intensity: f32) -> Self {
        Self {
            color: hex_to_linear(hex),
            intensity,
        }
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.0,
        }
    }
}

/// Omnidirectional light with a finite range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: [f32; 3],
    /// Linear RGB
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance at which the contribution reaches zero
    pub range: f32,
    /// Exponent applied to the linear falloff
    pub decay: f32,
    pub cast_shadow: bool,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: [5.0, 10.0, 5.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            range: 50.0,
            decay: 1.0,
            cast_shadow: false,
        }
    }
}

impl PointLight {
    /// Vertical field of view of the shadow frustum
    pub const SHADOW_FOV: Rad<f32> = Rad(2.0 * std::f32::consts::FRAC_PI_3);
    pub const SHADOW_NEAR: f32 = 0.5;

    pub fn from_hex(hex: u32, intensity: f32, range: f32) -> Self {
        Self {
            color: hex_to_linear(hex),
            intensity,
            range,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    pub fn with_shadow(mut self, cast_shadow: bool) -> Self {
        self.cast_shadow = cast_shadow;
        self
    }

    /// Contribution factor at `distance` from the light
    pub fn attenuation(&self, distance: f32) -> f32 {
        if self.range <= 0.0 {
            return 1.0;
        }
        (1.0 - distance / self.range).clamp(0.0, 1.0).powf(self.decay)
    }

    /// View-projection of the downward shadow frustum
    ///
    /// The frustum looks straight down from the light, so up is -Z.
    pub fn shadow_view_proj(&self) -> Matrix4<f32> {
        let eye = Point3::from(self.position);
        let target = eye + Vector3::new(0.0, -1.0, 0.0);
        let view = Matrix4::look_at_rh(eye, target, -Vector3::unit_z());
        let far = self.range.max(Self::SHADOW_NEAR + 1.0);
        let proj = OPENGL_TO_WGPU_MATRIX
            * cgmath::perspective(Self::SHADOW_FOV, 1.0, Self::SHADOW_NEAR, far);
        proj * view
    }
}

/// All lights in a scene
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub point: PointLight,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    fn project(m: Matrix4<f32>, p: [f32; 3]) -> [f32; 3] {
        let clip = m * Vector4::new(p[0], p[1], p[2], 1.0);
        [clip.x / clip.w, clip.y / clip.w, clip.z / clip.w]
    }

    #[test]
    fn test_attenuation_is_linear_with_unit_decay() {
        let light = PointLight::from_hex(0xffd700, 1.0, 50.0);
        assert_eq!(light.attenuation(0.0), 1.0);
        assert!((light.attenuation(25.0) - 0.5).abs() < 1e-6);
        assert_eq!(light.attenuation(50.0), 0.0);
        assert_eq!(light.attenuation(80.0), 0.0);
    }

    #[test]
    fn test_shadow_frustum_covers_room_floor() {
        let light = PointLight::from_hex(0xffd700, 1.0, 50.0).with_position(0.0, 10.0, 0.0);
        let m = light.shadow_view_proj();

        for corner in [[-10.0, 0.0, -10.0], [10.0, 0.0, -10.0], [-10.0, 0.0, 10.0], [10.0, 0.0, 10.0]] {
            let ndc = project(m, corner);
            assert!(ndc[0].abs() <= 1.0 && ndc[1].abs() <= 1.0, "{:?} -> {:?}", corner, ndc);
            assert!(ndc[2] >= 0.0 && ndc[2] <= 1.0);
        }

        // Straight below the light lands in the middle of the map
        let centre = project(m, [0.0, 0.0, 0.0]);
        assert!(centre[0].abs() < 1e-5 && centre[1].abs() < 1e-5);
    }
}
