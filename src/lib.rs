//! brand-compositor: Template and badge compositing for product imagery
//!
//! This crate applies brand templates (color wash, logo, company text) and
//! promotional badges to base images, always resolving to a usable image
//! reference even when fetching, decoding, or encoding fails.
//!
//! # Example
//!
//! ```no_run
//! use brand_compositor::{Compositor, ImageRef, PromotionalComponent, TemplateSettings};
//!
//! # async fn run() {
//! let compositor = Compositor::new();
//! let base = ImageRef::url("https://cdn.example.com/product.png");
//!
//! let settings = TemplateSettings {
//!     selected_color: Some("#3366cc".into()),
//!     company_text: Some("Acme Co".into()),
//!     ..Default::default()
//! };
//!
//! // Pipeline output feeds the next stage as-is.
//! let templated = compositor.apply_template(&base, Some(&settings)).await;
//!
//! let components = vec![PromotionalComponent {
//!     id: "promo-1".into(),
//!     name: "25% Off".into(),
//!     category: "promotion".into(),
//!     ..Default::default()
//! }];
//! let badged = compositor
//!     .apply_components(&templated, Some(&settings), &components)
//!     .await;
//! # }
//! ```
//!
//! # Settings
//!
//! [`TemplateSettings`] and [`PromotionalComponent`] deserialize from the
//! camelCase JSON the editing frontend emits, with every field optional;
//! absent configuration degrades to a no-op rather than an error.

pub mod color;
mod error;
pub mod geometry;
mod pipeline;
mod raster;
mod settings;
mod source;
pub mod text;

pub use geometry::{
    AnchorKeyword, BoundingBox, BoundingCircle, CanvasSize, TemplatePosition, PADDING,
};
pub use pipeline::{Compositor, ImageRef};
pub use settings::{
    select_promotion, PositionSpec, PromotionalComponent, TemplateSettings, TextAlignment,
    TextPosition,
};
pub use source::{ProxyRule, SourceResolver};
