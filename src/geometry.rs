//! Overlay geometry: anchor resolution, overlap testing, and the bounded
//! collision-avoidance search.
//!
//! All coordinates are f32 canvas pixels. Boxes and circles built here are
//! ephemeral: they exist only to place overlays and test for overlap, and
//! are never persisted.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::PositionSpec;

/// Default inset kept between any overlay and the canvas edge.
pub const PADDING: f32 = 16.0;

// ============================================================================
// Value Types
// ============================================================================

/// An axis-aligned rectangle used for overlap testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the right edge coordinate (x + w).
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate (y + h).
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// A circle used for overlap testing, centered at (x, y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCircle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl BoundingCircle {
    pub fn new(x: f32, y: f32, r: f32) -> Self {
        Self { x, y, r }
    }
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub w: f32,
    pub h: f32,
}

impl CanvasSize {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    pub fn of(image: &image::RgbaImage) -> Self {
        Self::new(image.width() as f32, image.height() as f32)
    }

    /// The smaller of the two dimensions.
    pub fn min_dim(&self) -> f32 {
        self.w.min(self.h)
    }
}

// ============================================================================
// Position Encodings
// ============================================================================

/// Named relative positions accepted in a component's position field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorKeyword {
    CenterLeft,
    CenterRight,
    CenterUp,
    CenterDown,
    Center,
}

impl AnchorKeyword {
    /// The fixed relative position (fractions of canvas size) this keyword
    /// maps to, e.g. `center-right` → 75% width, vertical center.
    pub fn relative(&self) -> (f32, f32) {
        match self {
            Self::CenterLeft => (0.25, 0.5),
            Self::CenterRight => (0.75, 0.5),
            Self::CenterUp => (0.5, 0.25),
            Self::CenterDown => (0.5, 0.75),
            Self::Center => (0.5, 0.5),
        }
    }
}

/// The six named corner/edge anchors a template can select for its logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TemplatePosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

impl TemplatePosition {
    /// Computes the draw origin (top-left) for an element of size
    /// `(ew, eh)` placed at this anchor with the given edge padding.
    pub fn origin(&self, canvas: CanvasSize, ew: f32, eh: f32, padding: f32) -> (f32, f32) {
        let x = match self {
            Self::TopLeft | Self::BottomLeft => padding,
            Self::TopCenter | Self::BottomCenter => (canvas.w - ew) / 2.0,
            Self::TopRight | Self::BottomRight => canvas.w - ew - padding,
        };
        let y = match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => padding,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => {
                canvas.h - eh - padding
            }
        };
        (x, y)
    }
}

// ============================================================================
// Anchor Resolution
// ============================================================================

/// Resolves a position specification into an element center point.
///
/// Three encodings are supported, resolved in this order:
/// - a numeric pair: both values in `(0, 1]` are fractions of the canvas,
///   any other pair is absolute pixels;
/// - a named keyword (`center-left`, `center`, ...);
/// - absence: the template's selected corner anchor when one exists, else a
///   pseudo-random pick between `center-left` and `center-right` with a
///   small vertical jitter (±5% of canvas height). The randomized fallback
///   is deliberate variety-seeking for repeated badge placement.
///
/// The result is not yet clamped; callers clamp against the element extent.
pub fn resolve_anchor(
    spec: Option<&PositionSpec>,
    template_position: Option<TemplatePosition>,
    canvas: CanvasSize,
    extent: (f32, f32),
    padding: f32,
) -> (f32, f32) {
    match spec {
        Some(PositionSpec::Pair { x, y }) => {
            if is_normalized(*x) && is_normalized(*y) {
                (x * canvas.w, y * canvas.h)
            } else {
                (*x, *y)
            }
        }
        Some(PositionSpec::Keyword(keyword)) => {
            let (fx, fy) = keyword.relative();
            (fx * canvas.w, fy * canvas.h)
        }
        None => match template_position {
            Some(position) => {
                let (ox, oy) = position.origin(canvas, extent.0, extent.1, padding);
                (ox + extent.0 / 2.0, oy + extent.1 / 2.0)
            }
            None => jittered_side_anchor(canvas),
        },
    }
}

/// Fraction test for the normalized pair encoding: `(0, 1]`.
fn is_normalized(v: f32) -> bool {
    v > 0.0 && v <= 1.0
}

/// Picks `center-left` or `center-right` at random, with ±5% of canvas
/// height vertical jitter.
fn jittered_side_anchor(canvas: CanvasSize) -> (f32, f32) {
    let mut rng = rand::rng();
    let keyword = if rng.random_bool(0.5) {
        AnchorKeyword::CenterLeft
    } else {
        AnchorKeyword::CenterRight
    };
    let (fx, fy) = keyword.relative();
    let jitter = rng.random_range(-0.05..=0.05) * canvas.h;
    (fx * canvas.w, fy * canvas.h + jitter)
}

// ============================================================================
// Clamping
// ============================================================================

/// Clamps a draw origin coordinate so an element of `extent` stays within
/// `[padding, dim - extent - padding]` on that axis.
pub fn clamp_axis(v: f32, extent: f32, dim: f32, padding: f32) -> f32 {
    let max = (dim - extent - padding).max(padding);
    v.clamp(padding, max)
}

/// Clamps a circle center so the whole circle stays inside the canvas,
/// padding included.
pub fn clamp_circle_center(
    center: (f32, f32),
    radius: f32,
    canvas: CanvasSize,
    padding: f32,
) -> (f32, f32) {
    (
        clamp_axis(center.0 - radius, radius * 2.0, canvas.w, padding) + radius,
        clamp_axis(center.1 - radius, radius * 2.0, canvas.h, padding) + radius,
    )
}

// ============================================================================
// Overlap & Collision Avoidance
// ============================================================================

/// Tests a box against a circle using the circle's bounding square.
///
/// Conservative: it may report overlap for configurations where the actual
/// circle clears the box corner. That only ever triggers a reposition, so
/// the approximation is acceptable.
pub fn box_circle_overlap(rect: &BoundingBox, circle: &BoundingCircle) -> bool {
    !(circle.x + circle.r < rect.x
        || circle.x - circle.r > rect.right()
        || circle.y + circle.r < rect.y
        || circle.y - circle.r > rect.bottom())
}

/// Moves a circle away from obstacle boxes using a fixed candidate list.
///
/// If the initial center overlaps no obstacle it is kept. Otherwise the
/// candidates right-center, left-center, top-center, bottom-center are
/// probed in order (clamped into bounds first) and the first clear one wins.
/// If all four overlap, the initial center is kept even though it collides.
/// The search has constant cost, at most 4 probes.
pub fn find_clear_position(
    initial: (f32, f32),
    radius: f32,
    obstacles: &[BoundingBox],
    canvas: CanvasSize,
    padding: f32,
) -> (f32, f32) {
    let overlaps = |center: (f32, f32)| {
        let circle = BoundingCircle::new(center.0, center.1, radius);
        obstacles.iter().any(|rect| box_circle_overlap(rect, &circle))
    };

    if !overlaps(initial) {
        return initial;
    }

    let candidates = [
        (canvas.w * 0.75, canvas.h * 0.5),
        (canvas.w * 0.25, canvas.h * 0.5),
        (canvas.w * 0.5, canvas.h * 0.25),
        (canvas.w * 0.5, canvas.h * 0.75),
    ];

    for candidate in candidates {
        let clamped = clamp_circle_center(candidate, radius, canvas, padding);
        if !overlaps(clamped) {
            return clamped;
        }
    }

    initial
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasSize = CanvasSize { w: 800.0, h: 600.0 };

    #[test]
    fn normalized_pair_scales_to_canvas() {
        let spec = PositionSpec::Pair { x: 0.5, y: 0.25 };
        let (x, y) = resolve_anchor(Some(&spec), None, CANVAS, (40.0, 40.0), PADDING);
        assert_eq!((x, y), (400.0, 150.0));
    }

    #[test]
    fn pixel_pair_passes_through() {
        let spec = PositionSpec::Pair { x: 120.0, y: 80.0 };
        let (x, y) = resolve_anchor(Some(&spec), None, CANVAS, (40.0, 40.0), PADDING);
        assert_eq!((x, y), (120.0, 80.0));

        // A pair with one coordinate outside (0, 1] is pixels, not a fraction.
        let spec = PositionSpec::Pair { x: 0.5, y: 300.0 };
        let (x, y) = resolve_anchor(Some(&spec), None, CANVAS, (40.0, 40.0), PADDING);
        assert_eq!((x, y), (0.5, 300.0));
    }

    #[test]
    fn keyword_maps_to_fixed_relative_positions() {
        let spec = PositionSpec::Keyword(AnchorKeyword::CenterRight);
        let (x, y) = resolve_anchor(Some(&spec), None, CANVAS, (40.0, 40.0), PADDING);
        assert_eq!((x, y), (600.0, 300.0));

        let spec = PositionSpec::Keyword(AnchorKeyword::Center);
        let (x, y) = resolve_anchor(Some(&spec), None, CANVAS, (40.0, 40.0), PADDING);
        assert_eq!((x, y), (400.0, 300.0));
    }

    #[test]
    fn absent_spec_falls_back_to_template_corner() {
        let (x, y) = resolve_anchor(
            None,
            Some(TemplatePosition::BottomRight),
            CANVAS,
            (40.0, 40.0),
            PADDING,
        );
        // Bottom-right origin (744, 544) plus half extent.
        assert_eq!((x, y), (764.0, 564.0));
    }

    #[test]
    fn absent_spec_without_template_picks_a_jittered_side() {
        for _ in 0..32 {
            let (x, y) = resolve_anchor(None, None, CANVAS, (40.0, 40.0), PADDING);
            assert!(
                (x - CANVAS.w * 0.25).abs() < 0.01 || (x - CANVAS.w * 0.75).abs() < 0.01,
                "x should be at 25% or 75% width, got {x}"
            );
            // Vertical center ±5% of canvas height.
            assert!((y - CANVAS.h * 0.5).abs() <= CANVAS.h * 0.05 + 0.01, "y jitter too large: {y}");
        }
    }

    #[test]
    fn template_origin_corners() {
        let canvas = CanvasSize::new(200.0, 100.0);
        assert_eq!(
            TemplatePosition::TopLeft.origin(canvas, 20.0, 10.0, 5.0),
            (5.0, 5.0)
        );
        assert_eq!(
            TemplatePosition::TopCenter.origin(canvas, 20.0, 10.0, 5.0),
            (90.0, 5.0)
        );
        assert_eq!(
            TemplatePosition::BottomRight.origin(canvas, 20.0, 10.0, 5.0),
            (175.0, 85.0)
        );
    }

    #[test]
    fn clamp_axis_bounds() {
        assert_eq!(clamp_axis(-10.0, 40.0, 800.0, 16.0), 16.0);
        assert_eq!(clamp_axis(790.0, 40.0, 800.0, 16.0), 744.0);
        assert_eq!(clamp_axis(100.0, 40.0, 800.0, 16.0), 100.0);
        // Element larger than the canvas: pinned at the padding edge.
        assert_eq!(clamp_axis(5.0, 900.0, 800.0, 16.0), 16.0);
    }

    #[test]
    fn circle_center_clamping_keeps_circle_inside() {
        let (x, y) = clamp_circle_center((790.0, 10.0), 50.0, CANVAS, PADDING);
        assert_eq!(x, CANVAS.w - 50.0 - PADDING);
        assert_eq!(y, 50.0 + PADDING);
    }

    #[test]
    fn overlap_uses_bounding_square() {
        let rect = BoundingBox::new(100.0, 100.0, 50.0, 50.0);

        // Clearly overlapping.
        assert!(box_circle_overlap(&rect, &BoundingCircle::new(125.0, 125.0, 10.0)));
        // Clearly disjoint on the x axis.
        assert!(!box_circle_overlap(&rect, &BoundingCircle::new(300.0, 125.0, 10.0)));
        // Corner case: the true circle misses the corner, but its bounding
        // square touches, so the conservative test reports overlap.
        assert!(box_circle_overlap(&rect, &BoundingCircle::new(95.0, 95.0, 7.0)));
    }

    #[test]
    fn clear_initial_position_is_kept() {
        let obstacles = [BoundingBox::new(0.0, 0.0, 50.0, 50.0)];
        let kept = find_clear_position((400.0, 300.0), 30.0, &obstacles, CANVAS, PADDING);
        assert_eq!(kept, (400.0, 300.0));
    }

    #[test]
    fn colliding_position_moves_to_first_clear_candidate() {
        // Obstacle square in the middle of the canvas covering the initial spot.
        let obstacles = [BoundingBox::new(350.0, 250.0, 100.0, 100.0)];
        let moved = find_clear_position((400.0, 300.0), 30.0, &obstacles, CANVAS, PADDING);
        // First candidate is right-center.
        assert_eq!(moved, (600.0, 300.0));
        let circle = BoundingCircle::new(moved.0, moved.1, 30.0);
        assert!(!box_circle_overlap(&obstacles[0], &circle));
    }

    #[test]
    fn all_candidates_blocked_keeps_original() {
        // One giant obstacle covering the whole canvas.
        let obstacles = [BoundingBox::new(0.0, 0.0, 800.0, 600.0)];
        let kept = find_clear_position((400.0, 300.0), 30.0, &obstacles, CANVAS, PADDING);
        assert_eq!(kept, (400.0, 300.0));
    }
}
