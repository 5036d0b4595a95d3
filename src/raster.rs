//! Raster compositing primitives shared by the pipelines.
//!
//! Everything here draws directly into an `RgbaImage` with source-over
//! alpha blending and skips pixels outside the destination, so callers can
//! pass unclamped geometry without risking a panic.

use image::{Rgba, RgbaImage};

// ============================================================================
// Blending
// ============================================================================

/// Alpha blends two RGBA pixels (source over destination).
pub fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Blends a single pixel into the canvas, skipping out-of-bounds targets.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let dst = *canvas.get_pixel(x as u32, y as u32);
    canvas.put_pixel(x as u32, y as u32, alpha_blend(color, dst));
}

/// Composites a source image onto the canvas at the given position.
pub fn composite_over(canvas: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    for sy in 0..src.height() {
        for sx in 0..src.width() {
            let pixel = *src.get_pixel(sx, sy);
            if pixel[3] == 0 {
                continue;
            }
            blend_pixel(canvas, x + sx as i32, y + sy as i32, pixel);
        }
    }
}

// ============================================================================
// Fills
// ============================================================================

/// Blends a color over the entire canvas. The wash strength comes from the
/// color's own alpha channel.
pub fn tint_wash(canvas: &mut RgbaImage, color: Rgba<u8>) {
    if color[3] == 0 {
        return;
    }
    for pixel in canvas.pixels_mut() {
        *pixel = alpha_blend(color, *pixel);
    }
}

/// Fills a disc with a radial gradient from `inner` at the center to
/// `outer` at the rim, with a half-pixel anti-aliased edge.
pub fn fill_gradient_disc(
    canvas: &mut RgbaImage,
    cx: f32,
    cy: f32,
    radius: f32,
    inner: Rgba<u8>,
    outer: Rgba<u8>,
) {
    if radius <= 0.0 {
        return;
    }
    let (x0, y0, x1, y1) = disc_bounds(canvas, cx, cy, radius);

    for y in y0..y1 {
        for x in x0..x1 {
            let dist = distance(x, y, cx, cy);
            if dist > radius + 0.5 {
                continue;
            }
            let t = (dist / radius).min(1.0);
            let mut color = lerp_rgba(inner, outer, t);
            // Edge coverage for the outermost ring.
            let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
            color[3] = (color[3] as f32 * coverage).round() as u8;
            blend_pixel(canvas, x, y, color);
        }
    }
}

/// Draws a soft circular shadow: a dark disc whose alpha falls off
/// quadratically toward the rim.
pub fn fill_soft_shadow(canvas: &mut RgbaImage, cx: f32, cy: f32, radius: f32, max_alpha: f32) {
    if radius <= 0.0 {
        return;
    }
    let (x0, y0, x1, y1) = disc_bounds(canvas, cx, cy, radius);

    for y in y0..y1 {
        for x in x0..x1 {
            let dist = distance(x, y, cx, cy);
            if dist > radius {
                continue;
            }
            let t = dist / radius;
            let alpha = max_alpha * (1.0 - t * t);
            blend_pixel(
                canvas,
                x,
                y,
                Rgba([0, 0, 0, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8]),
            );
        }
    }
}

/// Fills a translucent ellipse, used for the badge's sheen highlight.
/// Alpha fades linearly from the center to the ellipse edge.
pub fn fill_sheen(
    canvas: &mut RgbaImage,
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
    color: Rgba<u8>,
) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let x0 = (cx - rx).floor() as i32;
    let x1 = (cx + rx).ceil() as i32 + 1;
    let y0 = (cy - ry).floor() as i32;
    let y1 = (cy + ry).ceil() as i32 + 1;

    for y in y0..y1 {
        for x in x0..x1 {
            let nx = (x as f32 - cx) / rx;
            let ny = (y as f32 - cy) / ry;
            let d = nx * nx + ny * ny;
            if d > 1.0 {
                continue;
            }
            let mut faded = color;
            faded[3] = (color[3] as f32 * (1.0 - d)).round() as u8;
            blend_pixel(canvas, x, y, faded);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn disc_bounds(canvas: &RgbaImage, cx: f32, cy: f32, radius: f32) -> (i32, i32, i32, i32) {
    let x0 = ((cx - radius - 1.0).floor() as i32).max(0);
    let y0 = ((cy - radius - 1.0).floor() as i32).max(0);
    let x1 = ((cx + radius + 1.0).ceil() as i32 + 1).min(canvas.width() as i32);
    let y1 = ((cy + radius + 1.0).ceil() as i32 + 1).min(canvas.height() as i32);
    (x0, y0, x1, y1)
}

fn distance(x: i32, y: i32, cx: f32, cy: f32) -> f32 {
    let dx = x as f32 + 0.5 - cx;
    let dy = y as f32 + 0.5 - cy;
    (dx * dx + dy * dy).sqrt()
}

fn lerp_rgba(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let mix = |av: u8, bv: u8| (av as f32 + (bv as f32 - av as f32) * t).round() as u8;
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), mix(a[3], b[3])])
}

// ============================================================================
// Tests
// ============================================================================
