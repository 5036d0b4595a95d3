//! The compositing pipelines.
//!
//! Two entry points share one engine: [`Compositor::apply_template`]
//! (brand overlay: color wash, logo, company text) and
//! [`Compositor::apply_components`] (promotional badge). Both are pure
//! best-effort functions from an image reference to an image reference:
//! every asynchronous load and the final export are contained, and any
//! failure resolves with the *original* reference instead of an error.
//! When both overlays are wanted for one image, thread the template output
//! into the badge call: badge obstacle estimation assumes the template
//! overlay may already be present.
//!
//! Each invocation owns its raster, so concurrent composites never
//! interfere; the HTTP client inside the engine is the only shared handle.

mod badge;
mod template;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tracing::debug;

use crate::error::CompositeError;
use crate::source::SourceResolver;

/// Alpha of the full-canvas accent color wash.
pub(crate) const WASH_ALPHA: f32 = 0.1;
/// The logo is sized to at most this fraction of the canvas width.
pub(crate) const LOGO_CANVAS_FRACTION: f32 = 0.10;
/// Hard cap on the drawn logo width, in pixels.
pub(crate) const LOGO_MAX_WIDTH: f32 = 80.0;

// ============================================================================
// Image References
// ============================================================================

/// A best-effort image reference: a fetchable URL or an in-memory encoded
/// raster.
///
/// Both pipelines accept and return this type. A successful composite
/// yields a fresh [`ImageRef::Png`]; graceful degradation yields a clone of
/// the input. Success and fallback are deliberately indistinguishable by
/// type; callers that need to know compare the result against the
/// original with `==`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// A fetchable image URL.
    Url(String),
    /// PNG-encoded raster bytes.
    Png(Vec<u8>),
}

impl ImageRef {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::Png(bytes)
    }
}

// ============================================================================
// Compositor
// ============================================================================

/// The compositing engine.
///
/// Holds the shared HTTP client and the asset-proxy rewrite rules; all
/// per-composite state lives on the stack of each call.
///
/// # Example
///
/// ```no_run
/// use brand_compositor::{Compositor, ImageRef, TemplateSettings};
///
/// # async fn demo(settings: TemplateSettings, components: Vec<brand_compositor::PromotionalComponent>) {
/// let compositor = Compositor::new();
/// let base = ImageRef::url("https://cdn.example.com/generated.png");
///
/// // Template first, then badge, threading the output through.
/// let branded = compositor.apply_template(&base, Some(&settings)).await;
/// let final_image = compositor
///     .apply_components(&branded, Some(&settings), &components)
///     .await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Compositor {
    client: reqwest::Client,
    resolver: SourceResolver,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// An engine with the stock proxy rewrite rules.
    pub fn new() -> Self {
        Self::with_resolver(SourceResolver::default())
    }

    /// An engine with deployment-specific proxy rewrite rules.
    pub fn with_resolver(resolver: SourceResolver) -> Self {
        Self {
            client: reqwest::Client::new(),
            resolver,
        }
    }

    /// Loads and decodes the raster behind a reference.
    ///
    /// URL references are run through the proxy rewrite before fetching.
    /// The fetched byte buffer is scoped to this call and dropped on every
    /// exit path.
    pub(crate) async fn load_image(&self, image: &ImageRef) -> Result<RgbaImage, CompositeError> {
        match image {
            ImageRef::Png(bytes) => Ok(image::load_from_memory(bytes)?.to_rgba8()),
            ImageRef::Url(url) => {
                let url = self.resolver.rewrite(url);
                let bytes = self.fetch_bytes(&url).await?;
                Ok(image::load_from_memory(&bytes)?.to_rgba8())
            }
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CompositeError> {
        debug!(url, "fetching asset");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CompositeError::Status(response.status()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Encodes the finished canvas as PNG bytes.
pub(crate) fn export_png(canvas: &RgbaImage) -> Result<Vec<u8>, CompositeError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(CompositeError::Encode)?;
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================
