//! High-level crop operations.
//!
//! These functions combine calculations with backend execution: identify the
//! source, plan the centered region, let the backend copy and encode it, and
//! wrap the result as a [`NormalizedImage`].

use super::backend::{CropError, Dimensions, ImageBackend};
use super::calculations::{aspect_from_ratio, calculate_centered_crop};
use super::data_uri::encode_data_uri;
use super::params::{CropParams, Quality};
use crate::types::{ImageSource, NormalizedImage};

/// Result type for crop operations.
pub type Result<T> = std::result::Result<T, CropError>;

/// What every crop should produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropConfig {
    /// Target width / height.
    pub aspect: f64,
    pub quality: Quality,
}

impl CropConfig {
    /// Build from an integer `(width, height)` ratio. `None` if either side is zero.
    pub fn from_ratio(ratio: (u32, u32), quality: Quality) -> Option<Self> {
        aspect_from_ratio(ratio).map(|aspect| Self { aspect, quality })
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect: 4.0 / 3.0,
            quality: Quality::default(),
        }
    }
}

/// Plan a crop without executing it.
pub fn plan_crop(dims: Dimensions, config: &CropConfig) -> Result<CropParams> {
    calculate_centered_crop((dims.width, dims.height), config.aspect)
        .map(|region| CropParams {
            region,
            quality: config.quality,
        })
        .ok_or_else(|| {
            CropError::Render(format!(
                "cannot create a {:.4}:1 surface from a {}x{} source",
                config.aspect, dims.width, dims.height
            ))
        })
}

/// Crop `source` to the configured aspect ratio and encode it.
///
/// Either returns a complete [`NormalizedImage`] or fails; there are no
/// partial results.
pub fn crop_to_aspect(
    backend: &impl ImageBackend,
    source: &ImageSource,
    config: &CropConfig,
) -> Result<NormalizedImage> {
    let dims = backend.identify(source)?;
    let params = plan_crop(dims, config)?;
    log::debug!(
        "cropping {} to {}x{} at +{}+{}",
        source.describe(),
        params.region.width,
        params.region.height,
        params.region.x,
        params.region.y
    );

    let encoded = backend.crop(source, &params)?;
    let displayable = encode_data_uri(encoded.mime_type, &encoded.bytes);
    log::info!(
        "cropped {}x{} → {}x{} ({} bytes)",
        dims.width,
        dims.height,
        encoded.width,
        encoded.height,
        encoded.bytes.len()
    );

    Ok(NormalizedImage::new(
        encoded.bytes,
        displayable,
        encoded.width,
        encoded.height,
        encoded.mime_type,
    ))
}
