//! Startup settings
//!
//! Loaded from the JSON file named by `PLANTSHOP_CONFIG`. Every field is
//! optional; missing fields keep their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gfx::color::parse_hex;

/// Environment variable holding the config file path
pub const CONFIG_ENV: &str = "PLANTSHOP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Window title
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear colour as `#rrggbb`
    pub background: String,
    /// Leaf jitter seed; OS entropy when unset
    pub seed: Option<u64>,
    pub font_path: PathBuf,
    pub shadow_map_size: u32,
    pub vsync: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            title: "Plant Shop".to_string(),
            width: 1200,
            height: 800,
            background: "#f0f0f0".to_string(),
            seed: None,
            font_path: PathBuf::from("./fonts/helvetiker_regular.typeface.json"),
            shadow_map_size: 2048,
            vsync: true,
            damping_factor: 0.25,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
        }
    }
}

impl ShopConfig {
    pub fn from_json(json: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Loads from `PLANTSHOP_CONFIG` if set, otherwise returns defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("Loading config from {:?}", path);
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parsed background colour; invalid strings fall back to the default
    pub fn background_hex(&self) -> u32 {
        parse_hex(&self.background).unwrap_or_else(|| {
            log::warn!(
                "Invalid background colour {:?}, using #f0f0f0",
                self.background
            );
            0xf0f0f0
        })
    }

    /// Damping factor clamped to (0, 1]; anything else disables damping
    pub fn damping(&self) -> Option<f32> {
        (self.damping_factor > 0.0 && self.damping_factor <= 1.0).then_some(self.damping_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShopConfig::default();
        assert_eq!(config.title, "Plant Shop");
        assert_eq!((config.width, config.height), (1200, 800));
        assert_eq!(config.background_hex(), 0xf0f0f0);
        assert_eq!(config.seed, None);
        assert_eq!(config.shadow_map_size, 2048);
        assert!(config.vsync);
        assert_eq!(config.damping(), Some(0.25));
    }

    #[test]
    fn test_partial_json_overrides_named_fields() {
        let config = ShopConfig::from_json(
            r##"{ "seed": 42, "background": "#102030", "vsync": false }"##,
            Path::new("test.json"),
        )
        .unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.background_hex(), 0x102030);
        assert!(!config.vsync);
        assert_eq!(config.width, 1200);
        assert_eq!(config.zoom_speed, 0.1);
    }

    #[test]
    fn test_invalid_json() {
        let err = ShopConfig::from_json("{ \"width\": \"wide\" }", Path::new("bad.json"));
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = ShopConfig::load("/nonexistent/plantshop.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ShopConfig {
            background: "teal".to_string(),
            damping_factor: 0.0,
            ..ShopConfig::default()
        };
        assert_eq!(config.background_hex(), 0xf0f0f0);
        assert_eq!(config.damping(), None);
    }
}
