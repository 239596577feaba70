//! Typeface JSON fonts

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid typeface JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single glyph: horizontal advance plus outline commands
#[derive(Debug, Clone, Deserialize)]
pub struct Glyph {
    #[serde(default)]
    pub ha: f32,
    /// Outline command string; absent for blank glyphs such as space
    #[serde(default)]
    pub o: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BoundingBox {
    #[serde(rename = "xMin", default)]
    pub x_min: f32,
    #[serde(rename = "yMin", default)]
    pub y_min: f32,
    #[serde(rename = "xMax", default)]
    pub x_max: f32,
    #[serde(rename = "yMax", default)]
    pub y_max: f32,
}

fn default_resolution() -> f32 {
    1000.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    /// Keyed by the glyph's character as a string
    glyphs: HashMap<String, Glyph>,
    #[serde(default = "default_resolution")]
    pub resolution: f32,
    #[serde(default)]
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub underline_thickness: f32,
    #[serde(default)]
    pub family_name: String,
}

impl Font {
    pub fn from_json(json: &str) -> Result<Self, FontError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        let mut buf = [0u8; 4];
        self.glyphs.get(ch.encode_utf8(&mut buf) as &str)
    }

    /// Looks up `ch`, falling back to `?` when the font lacks it
    pub fn glyph_or_fallback(&self, ch: char) -> Option<&Glyph> {
        self.glyph(ch).or_else(|| {
            log::warn!(
                "Font '{}' has no glyph for {:?}, using '?'",
                self.family_name,
                ch
            );
            self.glyph('?')
        })
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Distance between baselines for text of the given size
    pub fn line_height(&self, size: f32) -> f32 {
        let bbox = self.bounding_box;
        (bbox.y_max - bbox.y_min + self.underline_thickness) * size / self.resolution
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two glyphs in a 100-unit em: a filled square and a square with a hole
    pub(crate) const TEST_FONT: &str = r#"{
        "familyName": "Test Sans",
        "resolution": 100,
        "underlineThickness": 10,
        "boundingBox": { "xMin": 0, "yMin": -20, "xMax": 100, "yMax": 80 },
        "glyphs": {
            "I": { "ha": 60, "o": "m 0 0 l 50 0 l 50 50 l 0 50" },
            "?": { "ha": 40, "o": "m 0 0 l 30 0 l 30 30 l 0 30 l 0 0" },
            "O": { "ha": 110, "o": "m 0 0 l 100 0 l 100 100 l 0 100 m 30 30 l 30 70 l 70 70 l 70 30" },
            " ": { "ha": 30 }
        }
    }"#;

    #[test]
    fn test_parse_metadata() {
        let font = Font::from_json(TEST_FONT).unwrap();
        assert_eq!(font.family_name, "Test Sans");
        assert_eq!(font.resolution, 100.0);
        assert_eq!(font.glyph_count(), 4);
        assert!(font.glyph(' ').unwrap().o.is_none());
        // (80 - -20 + 10) * 0.5 / 100
        assert!((font.line_height(0.5) - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_missing_glyph_falls_back() {
        let font = Font::from_json(TEST_FONT).unwrap();
        assert!(font.glyph('Z').is_none());
        assert_eq!(font.glyph_or_fallback('Z').unwrap().ha, 40.0);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            Font::from_json("{ \"glyphs\": 5 }"),
            Err(FontError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Font::load("/nonexistent/font.typeface.json").unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }
}
