//! Internal error taxonomy for the compositing pipelines.
//!
//! These errors never reach a caller: both pipeline entry points catch them
//! at the stage boundary, log a warning, and resolve with the original
//! image reference. The type exists so the stages themselves can use `?`
//! and so log lines carry a precise cause.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompositeError {
    /// Network-level failure fetching an asset.
    #[error("asset fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The asset host answered with a non-success status.
    #[error("asset fetch returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The fetched bytes could not be decoded as an image.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The composite raster could not be encoded for export.
    #[error("image export failed: {0}")]
    Encode(#[source] image::ImageError),
}
