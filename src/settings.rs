//! External data model: the brand template record read from the
//! configuration store and the AI-suggested promotional components.
//!
//! Both records arrive as camelCase JSON and are immutable for the duration
//! of a compositing call. Every field of [`TemplateSettings`] is optional;
//! absence of a field disables the corresponding overlay layer.

use serde::{Deserialize, Serialize};

use crate::geometry::{AnchorKeyword, TemplatePosition};

// ============================================================================
// Template Settings
// ============================================================================

/// Placement of the company text relative to the logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Above,
    #[default]
    Below,
    Left,
    Right,
}

/// Horizontal alignment of the company text against the logo's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// User-configured brand overlay parameters.
///
/// Sourced read-only from the configuration store once per compositing call.
///
/// # JSON Format
///
/// ```json
/// {
///   "logoPreview": "https://assets.example.com/logos/acme.png",
///   "selectedPosition": "bottom-right",
///   "selectedColor": "#ff6600",
///   "companyText": "Acme Inc",
///   "textColor": "#ffffff",
///   "textSize": 18,
///   "textPosition": "below",
///   "textAlignment": "center"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSettings {
    /// Reference to the logo image, fetched through the source resolver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_preview: Option<String>,

    /// Corner/edge anchor for the logo (and the fallback badge anchor).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_position: Option<TemplatePosition>,

    /// Accent color for the full-canvas wash; `"transparent"` disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,

    /// Company text drawn near the logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_text: Option<String>,

    /// Hex color for the company text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    /// Text size in pixels of glyph height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<f32>,

    /// Side of the logo the text sits on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_position: Option<TextPosition>,

    /// Horizontal alignment of the text against the logo span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<TextAlignment>,
}

impl TemplateSettings {
    /// The accent color, unless it is absent or explicitly `"transparent"`.
    pub fn wash_color(&self) -> Option<&str> {
        match self.selected_color.as_deref() {
            Some(color) if !color.trim().is_empty() && color != "transparent" => Some(color),
            _ => None,
        }
    }

    /// The company text, unless absent or blank.
    pub fn company_text(&self) -> Option<&str> {
        match self.company_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// True when no overlay layer would draw anything: no logo, no
    /// non-transparent color, no text. A no-op template short-circuits the
    /// template pipeline back to the original image.
    pub fn is_noop(&self) -> bool {
        self.logo_preview.is_none() && self.wash_color().is_none() && self.company_text().is_none()
    }
}

// ============================================================================
// Promotional Components
// ============================================================================

/// A badge position specification, as suggested by the AI service.
///
/// The wire format is a union: either a numeric `{x, y}` pair (fractions of
/// the canvas when both lie in `(0, 1]`, absolute pixels otherwise) or a
/// named keyword string. It is deserialized into this tagged variant once,
/// at pipeline entry, instead of shape-sniffing throughout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionSpec {
    Pair { x: f32, y: f32 },
    Keyword(AnchorKeyword),
}

/// An AI-suggested overlay candidate.
///
/// Only one component per image is ever rendered as a badge: the first one
/// that classifies as a promotion (see [`select_promotion`]).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromotionalComponent {
    pub id: String,

    /// Display label.
    #[serde(default)]
    pub name: String,

    /// Alternate display label, used when `name` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Classification string, matched case-insensitively against
    /// "promotion".
    #[serde(default)]
    pub category: String,

    /// Badge color: a hex string, or an arbitrary string that gets hashed
    /// to a deterministic color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Where to place the badge. Absent means template-anchor fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionSpec>,
}

impl PromotionalComponent {
    /// The label drawn inside the badge: `name`, falling back to `title`,
    /// falling back to `"Offer"`.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return self.name.trim();
        }
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => "Offer",
        }
    }

    /// True if this component should be rendered as a promotional badge:
    /// its category contains "promotion" (case-insensitive) or its label
    /// looks discount-like (`%`, "off", "discount", "promo").
    pub fn is_promotion(&self) -> bool {
        if self.category.to_lowercase().contains("promotion") {
            return true;
        }
        let label = self.display_name().to_lowercase();
        label.contains('%')
            || label.contains("off")
            || label.contains("discount")
            || label.contains("promo")
    }
}

/// Picks the single component to render as a badge: the first promotion
/// match wins, all others are ignored (one badge per image, by policy).
pub fn select_promotion(
    components: &[PromotionalComponent],
) -> Option<&PromotionalComponent> {
    components.iter().find(|c| c.is_promotion())
}

// ============================================================================
// Tests
// ============================================================================
