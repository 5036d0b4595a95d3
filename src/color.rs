//! Color derivation utilities for overlay rendering.
//!
//! Hex parsing and formatting live here; hue and lightness arithmetic goes
//! through `palette` HSL conversions. Every function in this module is
//! total: parse failures fall back to a safe value (the input color
//! unchanged, or opaque black) instead of propagating, so a malformed color
//! from a template or component can never abort a composite.

use image::Rgba;
use palette::{Hsl, IntoColor, Srgb};

// ============================================================================
// Hex Normalization & Parsing
// ============================================================================

/// Expands a hex color string to six digits, without a leading `#`.
///
/// - A leading `#` is accepted and stripped.
/// - Three-digit shorthand doubles each channel (`"f80"` → `"ff8800"`).
/// - Empty input defaults to black (`"000000"`).
/// - Inputs shorter than six digits are zero-padded; longer inputs are
///   truncated to six.
pub fn expand_short_hex(hex: &str) -> String {
    let hex = hex.trim_start_matches('#');
    if hex.is_empty() {
        return "000000".to_string();
    }
    if hex.chars().count() == 3 {
        return hex.chars().flat_map(|c| [c, c]).collect();
    }

    let mut out: String = hex.chars().take(6).collect();
    while out.chars().count() < 6 {
        out.push('0');
    }
    out
}

/// Returns true if the string looks like a hex color (with or without `#`):
/// three or six hex digits and nothing else.
pub fn is_hex_color(s: &str) -> bool {
    let digits = s.trim().trim_start_matches('#');
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Parses a hex color into RGB channels after normalization.
fn parse_channels(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = expand_short_hex(hex);
    if !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Formats RGB channels as a `#rrggbb` string.
fn format_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

// ============================================================================
// Hex <-> HSL
// ============================================================================

/// Converts a hex color to HSL.
///
/// Returns `None` on parse failure; callers must treat `None` as "use the
/// original color unchanged".
pub fn hex_to_hsl(hex: &str) -> Option<Hsl> {
    let (r, g, b) = parse_channels(hex)?;
    let rgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    Some(rgb.into_color())
}

/// Converts an HSL color back to a `#rrggbb` string.
///
/// Saturation and lightness are clamped to `[0, 1]` before conversion; the
/// hue wraps naturally.
pub fn hsl_to_hex(mut hsl: Hsl) -> String {
    hsl.saturation = hsl.saturation.clamp(0.0, 1.0);
    hsl.lightness = hsl.lightness.clamp(0.0, 1.0);
    let rgb: Srgb = hsl.into_color();
    format_hex(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

// ============================================================================
// Derivation
// ============================================================================

/// Hashes an arbitrary string to a deterministic `#rrggbb` color.
///
/// Uses the classic rolling hash `hash = ch + (hash << 5) - hash` with
/// 32-bit wraparound, then shifts bytes of the hash out into the RGB
/// channels. The same string always yields the same color; distinct strings
/// may collide, which is acceptable for badge coloring.
pub fn string_to_hex(s: &str) -> String {
    let mut hash: i32 = 0;
    for ch in s.chars() {
        hash = (ch as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }

    let channel = |i: u32| (hash.wrapping_shr(i * 8) & 0xff) as u8;
    format_hex(channel(0), channel(1), channel(2))
}

/// Rotates a hex color's hue by `degrees`, wrapping into `[0, 360)`.
///
/// Parse failure returns the input unchanged.
pub fn shift_hue(hex: &str, degrees: f32) -> String {
    match hex_to_hsl(hex) {
        Some(mut hsl) => {
            hsl.hue += degrees;
            hsl_to_hex(hsl)
        }
        None => hex.to_string(),
    }
}

/// Adjusts a hex color's lightness by `amount`, clamping to `[0, 1]`.
///
/// Negative amounts darken, positive amounts lighten. Parse failure returns
/// the input unchanged.
pub fn adjust_luminance(hex: &str, amount: f32) -> String {
    match hex_to_hsl(hex) {
        Some(mut hsl) => {
            hsl.lightness = (hsl.lightness + amount).clamp(0.0, 1.0);
            hsl_to_hex(hsl)
        }
        None => hex.to_string(),
    }
}

/// Resolves a hex color and alpha into a drawable RGBA pixel.
///
/// Parse failure yields opaque black at the given alpha, so a broken color
/// string still produces a usable draw value.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> Rgba<u8> {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    match parse_channels(hex) {
        Some((r, g, b)) => Rgba([r, g, b, a]),
        None => Rgba([0, 0, 0, a]),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expand_handles_shorthand_and_padding() {
        assert_eq!(expand_short_hex("#f80"), "ff8800");
        assert_eq!(expand_short_hex("abc"), "aabbcc");
        assert_eq!(expand_short_hex("#3366cc"), "3366cc");
        assert_eq!(expand_short_hex(""), "000000");
        assert_eq!(expand_short_hex("#"), "000000");
        assert_eq!(expand_short_hex("ab"), "ab0000");
        assert_eq!(expand_short_hex("1234567890"), "123456");
    }

    #[test]
    fn hex_color_detection() {
        assert!(is_hex_color("#3366cc"));
        assert!(is_hex_color("3366CC"));
        assert!(is_hex_color("#f80"));
        assert!(!is_hex_color("transparent"));
        assert!(!is_hex_color("ocean blue"));
        assert!(!is_hex_color("#12345"));
    }

    #[test]
    fn hsl_roundtrip_within_rounding() {
        for hex in ["#ff0000", "#00ff00", "#0000ff", "#3366cc", "#818a91", "#f0e68c"] {
            let hsl = hex_to_hsl(hex).unwrap();
            let back = hsl_to_hex(hsl);
            let (r1, g1, b1) = parse_channels(hex).unwrap();
            let (r2, g2, b2) = parse_channels(&back).unwrap();
            assert!(r1.abs_diff(r2) <= 1, "{hex} -> {back} red drifted");
            assert!(g1.abs_diff(g2) <= 1, "{hex} -> {back} green drifted");
            assert!(b1.abs_diff(b2) <= 1, "{hex} -> {back} blue drifted");
        }
    }

    #[test]
    fn hsl_parse_failure_is_none() {
        assert!(hex_to_hsl("transparent").is_none());
        assert!(hex_to_hsl("zzzzzz").is_none());
    }

    #[test]
    fn string_hash_is_deterministic() {
        let a = string_to_hex("Summer Sale");
        let b = string_to_hex("Summer Sale");
        assert_eq!(a, b);
        assert!(a.starts_with('#') && a.len() == 7);

        // Different strings should usually differ (not guaranteed, but these do).
        assert_ne!(string_to_hex("alpha"), string_to_hex("beta"));
    }

    #[test]
    fn hue_shift_roundtrip() {
        for degrees in [15.0f32, 120.0, 330.0, -45.0] {
            let shifted = shift_hue("#3366cc", degrees);
            let back = shift_hue(&shifted, -degrees);
            let (r1, g1, b1) = parse_channels("#3366cc").unwrap();
            let (r2, g2, b2) = parse_channels(&back).unwrap();
            assert!(r1.abs_diff(r2) <= 2, "{degrees}: {back}");
            assert!(g1.abs_diff(g2) <= 2, "{degrees}: {back}");
            assert!(b1.abs_diff(b2) <= 2, "{degrees}: {back}");
        }
    }

    #[test]
    fn hue_shift_changes_color() {
        let shifted = shift_hue("#3366cc", 20.0);
        assert_ne!(shifted, "#3366cc");
    }

    #[test]
    fn shift_on_unparseable_returns_input() {
        assert_eq!(shift_hue("not-a-color!", 40.0), "not-a-color!");
        assert_eq!(adjust_luminance("not-a-color!", 0.2), "not-a-color!");
    }

    #[test]
    fn luminance_darkens_and_clamps() {
        let darker = adjust_luminance("#808080", -0.2);
        let hsl_orig = hex_to_hsl("#808080").unwrap();
        let hsl_dark = hex_to_hsl(&darker).unwrap();
        assert!(hsl_dark.lightness < hsl_orig.lightness);

        // Clamping: darkening black stays black, lightening white stays white.
        assert_eq!(adjust_luminance("#000000", -0.5), "#000000");
        assert_eq!(adjust_luminance("#ffffff", 0.5), "#ffffff");
    }

    #[test]
    fn rgba_resolution_and_fallback() {
        assert_eq!(hex_to_rgba("#ff0000", 1.0), Rgba([255, 0, 0, 255]));
        assert_eq!(hex_to_rgba("#f00", 0.5), Rgba([255, 0, 0, 128]));
        // Parse failure: opaque black at the requested alpha.
        assert_eq!(hex_to_rgba("transparent", 0.1), Rgba([0, 0, 0, 26]));
    }
}
