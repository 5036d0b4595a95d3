//! Text layout and rendering over the canvas.
//!
//! Glyphs come from the Spleen 12x24 PSF2 bitmap font, scaled
//! nearest-neighbor to the configured text size. The font is monospaced,
//! so text measurement is an exact character-count times advance product,
//! the same arithmetic the badge pipeline uses to estimate text obstacle
//! boxes.

use image::{Rgba, RgbaImage};
use spleen_font::{PSF2Font, FONT_12X24};

use crate::geometry::{clamp_axis, BoundingBox, CanvasSize};
use crate::raster::blend_pixel;
use crate::settings::{TextAlignment, TextPosition};

/// Native glyph cell width of the Spleen 12x24 font.
pub const GLYPH_WIDTH: f32 = 12.0;
/// Native glyph cell height of the Spleen 12x24 font.
pub const GLYPH_HEIGHT: f32 = 24.0;
/// Gap kept between the logo and the company text.
pub const TEXT_SPACING: f32 = 8.0;
/// Glyph height used when the template does not configure a text size.
pub const DEFAULT_TEXT_SIZE: f32 = 24.0;

// ============================================================================
// Measurement
// ============================================================================

/// Converts a configured text size (pixel glyph height) into a font scale.
pub fn scale_for_size(size: Option<f32>) -> f32 {
    size.unwrap_or(DEFAULT_TEXT_SIZE).clamp(8.0, 96.0) / GLYPH_HEIGHT
}

/// Measured width of a single line at the given scale.
pub fn measure_text(text: &str, scale: f32) -> f32 {
    text.chars().count() as f32 * GLYPH_WIDTH * scale
}

/// Glyph height at the given scale.
pub fn text_height(scale: f32) -> f32 {
    GLYPH_HEIGHT * scale
}

// ============================================================================
// Wrapping
// ============================================================================

/// Greedy word wrap: appends the next word to the current line while the
/// measured width stays under `max_width`; on overflow the current line is
/// committed and a new one starts with that word. A single word wider than
/// `max_width` gets its own (overflowing) line rather than being split.
pub fn wrap_text(text: &str, max_width: f32, scale: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure_text(&candidate, scale) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ============================================================================
// Drawing
// ============================================================================

/// Draws a single line of text with its top-left corner at (x, y).
///
/// Characters missing from the font are skipped; a font that fails to parse
/// draws nothing. Text is an enhancement layer, never a failure source.
pub fn draw_text(canvas: &mut RgbaImage, text: &str, x: f32, y: f32, color: Rgba<u8>, scale: f32) {
    let Ok(mut font) = PSF2Font::new(FONT_12X24) else {
        return;
    };
    let advance = GLYPH_WIDTH * scale;
    for (i, ch) in text.chars().enumerate() {
        if ch == ' ' {
            continue;
        }
        draw_glyph(canvas, &mut font, ch, x + i as f32 * advance, y, color, scale);
    }
}

/// Draws wrapped text centered on (cx, cy): lines are wrapped to
/// `max_width`, the block is centered vertically around `cy` (first line
/// center at `cy - total/2 + line_height/2`), and each line is centered
/// horizontally on `cx`.
pub fn draw_wrapped_centered(
    canvas: &mut RgbaImage,
    text: &str,
    cx: f32,
    cy: f32,
    max_width: f32,
    line_height: f32,
    color: Rgba<u8>,
    scale: f32,
) {
    let lines = wrap_text(text, max_width, scale);
    if lines.is_empty() {
        return;
    }
    let total = lines.len() as f32 * line_height;

    for (i, line) in lines.iter().enumerate() {
        let line_center = cy - total / 2.0 + line_height / 2.0 + i as f32 * line_height;
        let x = cx - measure_text(line, scale) / 2.0;
        let y = line_center - text_height(scale) / 2.0;
        draw_text(canvas, line, x, y, color, scale);
    }
}

fn draw_glyph(
    canvas: &mut RgbaImage,
    font: &mut PSF2Font,
    ch: char,
    x: f32,
    y: f32,
    color: Rgba<u8>,
    scale: f32,
) {
    let utf8 = ch.to_string();
    let Some(rows) = font.glyph_for_utf8(utf8.as_bytes()) else {
        return;
    };

    let src_w = GLYPH_WIDTH as usize;
    let src_h = GLYPH_HEIGHT as usize;
    let mut bitmap = vec![0u8; src_w * src_h];
    for (gy, row) in rows.enumerate().take(src_h) {
        for (gx, on) in row.enumerate().take(src_w) {
            if on {
                bitmap[gy * src_w + gx] = 1;
            }
        }
    }

    // Nearest-neighbor scale from the 12x24 cell to the target size.
    let dst_w = ((GLYPH_WIDTH * scale).round() as usize).max(1);
    let dst_h = ((GLYPH_HEIGHT * scale).round() as usize).max(1);
    let ox = x.round() as i32;
    let oy = y.round() as i32;

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            if bitmap[sy * src_w + sx] == 1 {
                blend_pixel(canvas, ox + dx as i32, oy + dy as i32, color);
            }
        }
    }
}

// ============================================================================
// Company Text Placement
// ============================================================================

/// Computes the draw origin for the company text.
///
/// With a logo box and a relative mode, the text sits adjacent to the logo
/// with a fixed spacing; for `above`/`below` the horizontal origin then
/// follows the alignment against the logo's span. Without a logo box the
/// text defaults to the bottom-left of the canvas. The final origin is
/// clamped into `[padding, dim - extent - padding]` on both axes.
pub fn position_company_text(
    logo_box: Option<&BoundingBox>,
    position: TextPosition,
    alignment: TextAlignment,
    text_w: f32,
    text_h: f32,
    canvas: CanvasSize,
    padding: f32,
) -> (f32, f32) {
    let (x, y) = match logo_box {
        Some(lb) => {
            let mut origin = match position {
                TextPosition::Above => (lb.x, lb.y - TEXT_SPACING - text_h),
                TextPosition::Below => (lb.x, lb.bottom() + TEXT_SPACING),
                TextPosition::Left => {
                    (lb.x - TEXT_SPACING - text_w, lb.y + (lb.h - text_h) / 2.0)
                }
                TextPosition::Right => (lb.right() + TEXT_SPACING, lb.y + (lb.h - text_h) / 2.0),
            };
            if matches!(position, TextPosition::Above | TextPosition::Below) {
                origin.0 = match alignment {
                    TextAlignment::Left => lb.x,
                    TextAlignment::Center => lb.x + (lb.w - text_w) / 2.0,
                    TextAlignment::Right => lb.right() - text_w,
                };
            }
            origin
        }
        None => (padding, canvas.h - text_h - padding),
    };

    (
        clamp_axis(x, text_w, canvas.w, padding),
        clamp_axis(y, text_h, canvas.h, padding),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PADDING;

    #[test]
    fn measurement_is_char_count_times_advance() {
        assert_eq!(measure_text("Acme", 1.0), 4.0 * GLYPH_WIDTH);
        assert_eq!(measure_text("Acme", 0.5), 2.0 * GLYPH_WIDTH);
        assert_eq!(measure_text("", 1.0), 0.0);
    }

    #[test]
    fn size_maps_to_scale_with_clamping() {
        assert_eq!(scale_for_size(None), 1.0);
        assert_eq!(scale_for_size(Some(48.0)), 2.0);
        assert_eq!(scale_for_size(Some(2.0)), 8.0 / GLYPH_HEIGHT);
        assert_eq!(scale_for_size(Some(500.0)), 4.0);
    }

    #[test]
    fn wrap_is_greedy() {
        // At scale 1.0 each char is 12px, so "20% OFF" measures 84px and
        // fits a 90px line whole.
        let lines = wrap_text("20% OFF", 90.0, 1.0);
        assert_eq!(lines, vec!["20% OFF"]);

        let lines = wrap_text("20% OFF everything today", 90.0, 1.0);
        assert_eq!(lines[0], "20% OFF");
        assert!(lines.len() >= 2);
        for line in &lines {
            // Only a single over-long word may exceed the width.
            assert!(
                measure_text(line, 1.0) <= 90.0 || !line.contains(' '),
                "wrapped line too wide: {line}"
            );
        }
    }

    #[test]
    fn wrap_keeps_overlong_word_whole() {
        let lines = wrap_text("unbreakablepromotionword", 60.0, 1.0);
        assert_eq!(lines, vec!["unbreakablepromotionword"]);
    }

    #[test]
    fn wrap_empty_text_yields_no_lines() {
        assert!(wrap_text("   ", 100.0, 1.0).is_empty());
    }

    #[test]
    fn drawing_text_touches_pixels() {
        let mut canvas = RgbaImage::from_pixel(100, 40, Rgba([0, 0, 0, 255]));
        draw_text(&mut canvas, "A", 10.0, 5.0, Rgba([255, 255, 255, 255]), 1.0);
        let lit = canvas.pixels().filter(|p| p[0] > 0).count();
        assert!(lit > 0, "glyph should light up some pixels");
    }

    #[test]
    fn wrapped_block_is_vertically_centered() {
        let mut canvas = RgbaImage::from_pixel(200, 200, Rgba([0, 0, 0, 255]));
        draw_wrapped_centered(
            &mut canvas,
            "BIG SALE",
            100.0,
            100.0,
            60.0,
            28.0,
            Rgba([255, 255, 255, 255]),
            1.0,
        );

        // Two lines of 28px centered on y=100: content spans roughly 72..128.
        let lit_rows: Vec<u32> = (0..200)
            .filter(|&y| (0..200).any(|x| canvas.get_pixel(x, y)[0] > 0))
            .collect();
        assert!(!lit_rows.is_empty());
        let first = *lit_rows.first().unwrap() as f32;
        let last = *lit_rows.last().unwrap() as f32;
        assert!((first + last) / 2.0 > 90.0 && (first + last) / 2.0 < 110.0);
    }

    #[test]
    fn company_text_sits_below_logo() {
        let logo = BoundingBox::new(100.0, 100.0, 60.0, 60.0);
        let canvas = CanvasSize::new(800.0, 600.0);
        let (x, y) = position_company_text(
            Some(&logo),
            TextPosition::Below,
            TextAlignment::Center,
            48.0,
            24.0,
            canvas,
            PADDING,
        );
        assert_eq!(y, logo.bottom() + TEXT_SPACING);
        assert_eq!(x, logo.x + (logo.w - 48.0) / 2.0);
    }

    #[test]
    fn alignment_variants_shift_horizontal_origin() {
        let logo = BoundingBox::new(100.0, 100.0, 60.0, 60.0);
        let canvas = CanvasSize::new(800.0, 600.0);
        let place = |alignment| {
            position_company_text(
                Some(&logo),
                TextPosition::Above,
                alignment,
                40.0,
                24.0,
                canvas,
                PADDING,
            )
            .0
        };
        assert_eq!(place(TextAlignment::Left), logo.x);
        assert_eq!(place(TextAlignment::Center), logo.x + 10.0);
        assert_eq!(place(TextAlignment::Right), logo.right() - 40.0);
    }

    #[test]
    fn no_logo_defaults_to_bottom_left() {
        let canvas = CanvasSize::new(800.0, 600.0);
        let (x, y) = position_company_text(
            None,
            TextPosition::Below,
            TextAlignment::Left,
            120.0,
            24.0,
            canvas,
            PADDING,
        );
        assert_eq!((x, y), (PADDING, 600.0 - 24.0 - PADDING));
    }

    #[test]
    fn origin_is_clamped_into_canvas() {
        // Logo at the very top: text above it would leave the canvas.
        let logo = BoundingBox::new(10.0, 2.0, 60.0, 60.0);
        let canvas = CanvasSize::new(800.0, 600.0);
        let (x, y) = position_company_text(
            Some(&logo),
            TextPosition::Above,
            TextAlignment::Left,
            500.0,
            24.0,
            canvas,
            PADDING,
        );
        assert!(x >= PADDING && x + 500.0 <= canvas.w - PADDING);
        assert!(y >= PADDING && y + 24.0 <= canvas.h - PADDING);
    }
}
