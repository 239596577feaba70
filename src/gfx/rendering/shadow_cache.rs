//! Shadow map caching
//!
//! The shadow map is regenerated only when:
//! - the light moves, changes range or toggles shadow casting
//! - the scene revision changes (objects or materials added)
//! - invalidation is requested manually
//!
//! The shop is static, so after the first frame the shadow pass is skipped
//! until the labels arrive.

use crate::gfx::scene::PointLight;

/// The light parameters that affect the shadow map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub position: [f32; 3],
    pub range: f32,
    pub cast_shadow: bool,
}

impl LightState {
    pub fn from_light(light: &PointLight) -> Self {
        Self {
            position: light.position,
            range: light.range,
            cast_shadow: light.cast_shadow,
        }
    }

    /// Checks if this light state differs significantly from another
    pub fn differs_from(&self, other: &LightState) -> bool {
        const EPSILON: f32 = 0.001;

        if self.cast_shadow != other.cast_shadow {
            return true;
        }

        if (self.range - other.range).abs() > EPSILON {
            return true;
        }

        self.position
            .iter()
            .zip(other.position.iter())
            .any(|(a, b)| (a - b).abs() > EPSILON)
    }
}

/// Shadow map cache manager
#[derive(Debug, Default)]
pub struct ShadowCache {
    last_revision: Option<u64>,
    last_light_state: Option<LightState>,
}

impl ShadowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the shadow map needs to be regenerated
    pub fn needs_update(&self, revision: u64, light: &PointLight) -> bool {
        if self.last_revision != Some(revision) {
            return true;
        }

        match self.last_light_state {
            Some(ref last_light) => LightState::from_light(light).differs_from(last_light),
            None => true,
        }
    }

    /// Records the state the shadow map was just rendered with
    pub fn mark_valid(&mut self, revision: u64, light: &PointLight) {
        self.last_revision = Some(revision);
        self.last_light_state = Some(LightState::from_light(light));
    }

    pub fn is_valid(&self) -> bool {
        self.last_revision.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> PointLight {
        PointLight::from_hex(0xffd700, 1.0, 50.0)
            .with_position(0.0, 10.0, 0.0)
            .with_shadow(true)
    }

    #[test]
    fn test_first_frame_needs_update() {
        let cache = ShadowCache::new();
        assert!(!cache.is_valid());
        assert!(cache.needs_update(0, &light()));
    }

    #[test]
    fn test_static_scene_hits_cache() {
        let mut cache = ShadowCache::new();
        cache.mark_valid(42, &light());
        assert!(cache.is_valid());
        assert!(!cache.needs_update(42, &light()));
    }

    #[test]
    fn test_revision_change_misses() {
        let mut cache = ShadowCache::new();
        cache.mark_valid(42, &light());
        assert!(cache.needs_update(45, &light()));
    }

    #[test]
    fn test_light_change_misses() {
        let mut cache = ShadowCache::new();
        cache.mark_valid(1, &light());

        let moved = light().with_position(0.0, 12.0, 0.0);
        assert!(cache.needs_update(1, &moved));

        // Colour and intensity do not affect depth
        let mut tinted = light();
        tinted.intensity = 3.0;
        tinted.color = [1.0, 0.0, 0.0];
        assert!(!cache.needs_update(1, &tinted));
    }
}
