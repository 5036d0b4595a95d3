//! Pipeline B: the promotional badge.
//!
//! Picks the first promotion-like component, derives a badge color from it,
//! places a gradient disc clear of the estimated logo and text footprints,
//! then draws a soft shadow, the disc, a sheen highlight, and the wrapped
//! label. Same containment contract as the template pipeline: any failure
//! returns the original base reference.

use image::RgbaImage;
use rand::prelude::*;
use tracing::{debug, warn};

use super::{export_png, Compositor, ImageRef, LOGO_CANVAS_FRACTION, LOGO_MAX_WIDTH};
use crate::color::{
    adjust_luminance, expand_short_hex, hex_to_rgba, is_hex_color, shift_hue, string_to_hex,
};
use crate::geometry::{
    clamp_axis, clamp_circle_center, find_clear_position, resolve_anchor, BoundingBox, CanvasSize,
    PADDING,
};
use crate::raster;
use crate::settings::{select_promotion, PromotionalComponent, TemplateSettings};
use crate::text;

/// Badge inner radius as a fraction of the smaller canvas dimension.
const INNER_RADIUS_FRACTION: f32 = 0.18;
/// Outer (shadow/placement) radius as a multiple of the inner radius.
const OUTER_RADIUS_FACTOR: f32 = 1.25;
/// Usable label width as a fraction of the inner diameter.
const BADGE_TEXT_WIDTH_FACTOR: f32 = 0.78;
/// Hue shift applied to every derived badge color, in degrees.
const HUE_SHIFT_DEGREES: std::ops::RangeInclusive<f32> = 12.0..=32.0;

/// Fallback colors when a component carries neither a hex color nor a
/// usable name to hash.
const BADGE_PALETTE: [&str; 10] = [
    "#e63946", "#f4a261", "#e76f51", "#2a9d8f", "#264653", "#6d597a", "#b56576", "#355070",
    "#43aa8b", "#f3722c",
];

impl Compositor {
    /// Applies the promotional badge for the first promotion-like component.
    ///
    /// Returns the original `base` unchanged when no component qualifies,
    /// and on any load or export failure. Successful composites return a
    /// fresh [`ImageRef::Png`].
    pub async fn apply_components(
        &self,
        base: &ImageRef,
        settings: Option<&TemplateSettings>,
        components: &[PromotionalComponent],
    ) -> ImageRef {
        let Some(promotion) = select_promotion(components) else {
            debug!("no promotional component, returning original");
            return base.clone();
        };

        let mut canvas = match self.load_image(base).await {
            Ok(image) => image,
            Err(err) => {
                warn!(error = %err, "base image load failed, returning original");
                return base.clone();
            }
        };

        let size = CanvasSize::of(&canvas);
        let color = resolve_badge_color(promotion);
        let inner_radius = size.min_dim() * INNER_RADIUS_FRACTION;
        let outer_radius = inner_radius * OUTER_RADIUS_FACTOR;
        let extent = outer_radius * 2.0;

        let anchor = resolve_anchor(
            promotion.position.as_ref(),
            settings.and_then(|s| s.selected_position),
            size,
            (extent, extent),
            PADDING,
        );
        let anchor = clamp_circle_center(anchor, outer_radius, size, PADDING);

        let obstacles = estimated_obstacles(settings, size);
        let center = find_clear_position(anchor, outer_radius, &obstacles, size, PADDING);
        debug!(
            component = %promotion.id,
            color = %color,
            x = center.0,
            y = center.1,
            "drawing promotional badge"
        );

        draw_badge(
            &mut canvas,
            center,
            inner_radius,
            outer_radius,
            &color,
            promotion.display_name(),
        );

        match export_png(&canvas) {
            Ok(bytes) => ImageRef::Png(bytes),
            Err(err) => {
                warn!(error = %err, "export failed, returning original");
                base.clone()
            }
        }
    }
}

/// Derives the badge fill color for a component.
///
/// An explicit hex color wins; any other non-blank color string is hashed
/// to a deterministic color; a component without a color gets a random
/// palette pick. The result is always hue-shifted by a random 12 to 32
/// degrees so repeated badges over the same artwork vary.
pub fn resolve_badge_color(component: &PromotionalComponent) -> String {
    let mut rng = rand::rng();
    let base = match component.color.as_deref().map(str::trim) {
        Some(color) if is_hex_color(color) => format!("#{}", expand_short_hex(color)),
        Some(color) if !color.is_empty() => string_to_hex(color),
        _ => (*BADGE_PALETTE.choose(&mut rng).unwrap_or(&BADGE_PALETTE[0])).to_string(),
    };
    shift_hue(&base, rng.random_range(HUE_SHIFT_DEGREES))
}

/// Estimates the logo and company-text footprints from settings alone,
/// without fetching the logo. The logo is assumed square at its capped
/// width; the text box reuses the template pipeline's placement math.
fn estimated_obstacles(settings: Option<&TemplateSettings>, size: CanvasSize) -> Vec<BoundingBox> {
    let Some(settings) = settings else {
        return Vec::new();
    };
    let mut obstacles = Vec::new();

    let logo_box = settings.logo_preview.as_ref().map(|_| {
        let w = (size.w * LOGO_CANVAS_FRACTION).min(LOGO_MAX_WIDTH).max(1.0);
        let position = settings.selected_position.unwrap_or_default();
        let (x, y) = position.origin(size, w, w, PADDING);
        BoundingBox::new(
            clamp_axis(x, w, size.w, PADDING),
            clamp_axis(y, w, size.h, PADDING),
            w,
            w,
        )
    });

    if let Some(content) = settings.company_text() {
        let scale = text::scale_for_size(settings.text_size);
        let text_w = text::measure_text(content, scale);
        let text_h = text::text_height(scale);
        let (x, y) = text::position_company_text(
            logo_box.as_ref(),
            settings.text_position.unwrap_or_default(),
            settings.text_alignment.unwrap_or_default(),
            text_w,
            text_h,
            size,
            PADDING,
        );
        obstacles.push(BoundingBox::new(x, y, text_w, text_h));
    }

    obstacles.extend(logo_box);
    obstacles
}

/// Draws the badge stack at `center`: soft shadow, radial gradient disc,
/// sheen highlight, wrapped white label.
fn draw_badge(
    canvas: &mut RgbaImage,
    center: (f32, f32),
    inner_radius: f32,
    outer_radius: f32,
    color: &str,
    label: &str,
) {
    let (cx, cy) = center;

    raster::fill_soft_shadow(canvas, cx + 2.0, cy + 3.0, outer_radius + 3.0, 0.35);
    raster::fill_gradient_disc(
        canvas,
        cx,
        cy,
        inner_radius,
        hex_to_rgba(color, 1.0),
        hex_to_rgba(&adjust_luminance(color, -0.06), 1.0),
    );
    raster::fill_sheen(
        canvas,
        cx - inner_radius * 0.35,
        cy - inner_radius * 0.45,
        inner_radius * 0.55,
        inner_radius * 0.32,
        image::Rgba([255, 255, 255, 64]),
    );

    let scale = (inner_radius * 0.5 / text::GLYPH_HEIGHT).clamp(0.4, 4.0);
    let max_width = inner_radius * 2.0 * BADGE_TEXT_WIDTH_FACTOR;
    let line_height = text::text_height(scale) * 1.15;
    text::draw_wrapped_centered(
        canvas,
        label,
        cx,
        cy,
        max_width,
        line_height,
        image::Rgba([255, 255, 255, 255]),
        scale,
    );
}

// ============================================================================
// Tests
// ============================================================================
