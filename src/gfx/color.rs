//! Colour conversion helpers
//!
//! Colours are authored as sRGB hex values and shaded in linear space.

/// Converts one sRGB-encoded channel to linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Splits a `0xRRGGBB` value into sRGB channels in `[0, 1]`
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Converts a `0xRRGGBB` value to linear RGB
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_srgb(hex).map(srgb_to_linear)
}

/// Parses `"#rrggbb"`, `"0xrrggbb"` or `"rrggbb"`
pub fn parse_hex(text: &str) -> Option<u32> {
    let digits = text
        .trim()
        .trim_start_matches('#')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex_to_srgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_srgb(0x000000), [0.0, 0.0, 0.0]);
        let [r, g, b] = hex_to_srgb(0x8b4513);
        assert!((r - 139.0 / 255.0).abs() < 1e-6);
        assert!((g - 69.0 / 255.0).abs() < 1e-6);
        assert!((b - 19.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_endpoints_and_midtone() {
        assert_eq!(hex_to_linear(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        // sRGB 0.5 is roughly 0.214 linear
        assert!((srgb_to_linear(0.5) - 0.214).abs() < 1e-3);
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_hex("#f0f0f0"), Some(0xf0f0f0));
        assert_eq!(parse_hex("0xFFD700"), Some(0xffd700));
        assert_eq!(parse_hex("333333"), Some(0x333333));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("zzzzzz"), None);
    }
}
