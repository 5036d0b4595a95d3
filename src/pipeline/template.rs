//! Pipeline A: the brand template overlay.
//!
//! Stage order over one owned canvas: base → color wash → logo → company
//! text → export. A no-op template short-circuits to the original; a base
//! load or export failure falls back to the original; a logo load failure
//! only skips the logo layer.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::{debug, warn};

use super::{export_png, Compositor, ImageRef, LOGO_CANVAS_FRACTION, LOGO_MAX_WIDTH, WASH_ALPHA};
use crate::color::hex_to_rgba;
use crate::geometry::{clamp_axis, BoundingBox, CanvasSize, TemplatePosition, PADDING};
use crate::raster;
use crate::settings::TemplateSettings;
use crate::text;

impl Compositor {
    /// Applies the brand template overlay to a base image.
    ///
    /// Always resolves with a usable reference: configuration absence and
    /// every load/export failure return the original `base`. Successful
    /// composites return a fresh [`ImageRef::Png`].
    pub async fn apply_template(
        &self,
        base: &ImageRef,
        settings: Option<&TemplateSettings>,
    ) -> ImageRef {
        let Some(settings) = settings else {
            debug!("no template settings, returning original");
            return base.clone();
        };
        if settings.is_noop() {
            debug!("template has no drawable layers, returning original");
            return base.clone();
        }

        let mut canvas = match self.load_image(base).await {
            Ok(image) => image,
            Err(err) => {
                warn!(error = %err, "base image load failed, returning original");
                return base.clone();
            }
        };

        if let Some(color) = settings.wash_color() {
            debug!(color, "drawing color wash");
            raster::tint_wash(&mut canvas, hex_to_rgba(color, WASH_ALPHA));
        }

        let mut logo_box = None;
        if let Some(reference) = &settings.logo_preview {
            match self.load_image(&ImageRef::Url(reference.clone())).await {
                Ok(logo) => {
                    let position = settings.selected_position.unwrap_or_default();
                    logo_box = Some(draw_logo(&mut canvas, &logo, position));
                }
                // The logo is optional, not fatal: continue to the text layer.
                Err(err) => warn!(error = %err, "logo load failed, skipping logo layer"),
            }
        }

        draw_company_text(&mut canvas, settings, logo_box.as_ref());

        match export_png(&canvas) {
            Ok(bytes) => ImageRef::Png(bytes),
            Err(err) => {
                warn!(error = %err, "export failed, returning original");
                base.clone()
            }
        }
    }
}

/// Draws the logo at its template anchor, sized to at most 10% of the
/// canvas width (capped at 80 px), aspect preserved. Returns the drawn box
/// for downstream text placement.
fn draw_logo(canvas: &mut RgbaImage, logo: &RgbaImage, position: TemplatePosition) -> BoundingBox {
    let size = CanvasSize::of(canvas);
    let target_w = (size.w * LOGO_CANVAS_FRACTION).min(LOGO_MAX_WIDTH).max(1.0);
    let aspect = logo.height() as f32 / logo.width().max(1) as f32;
    let target_h = (target_w * aspect).max(1.0);

    let scaled = imageops::resize(
        logo,
        target_w.round() as u32,
        target_h.round() as u32,
        FilterType::Triangle,
    );

    let (x, y) = position.origin(size, target_w, target_h, PADDING);
    let x = clamp_axis(x, target_w, size.w, PADDING);
    let y = clamp_axis(y, target_h, size.h, PADDING);
    raster::composite_over(canvas, &scaled, x.round() as i32, y.round() as i32);

    BoundingBox::new(x, y, target_w, target_h)
}

/// Draws the company text adjacent to the logo (or at the bottom-left
/// default when no logo was drawn).
fn draw_company_text(
    canvas: &mut RgbaImage,
    settings: &TemplateSettings,
    logo_box: Option<&BoundingBox>,
) {
    let Some(content) = settings.company_text() else {
        return;
    };
    let size = CanvasSize::of(canvas);
    let scale = text::scale_for_size(settings.text_size);
    let text_w = text::measure_text(content, scale);
    let text_h = text::text_height(scale);

    let (x, y) = text::position_company_text(
        logo_box,
        settings.text_position.unwrap_or_default(),
        settings.text_alignment.unwrap_or_default(),
        text_w,
        text_h,
        size,
        PADDING,
    );

    let color = hex_to_rgba(settings.text_color.as_deref().unwrap_or("#ffffff"), 1.0);
    text::draw_text(canvas, content, x, y, color, scale);
}

// ============================================================================
// Tests
// ============================================================================
