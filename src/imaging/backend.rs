//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify (read dimensions without a full decode) and crop (copy a
//! region into a new surface and encode it).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::CropParams;
use crate::types::ImageSource;
use thiserror::Error;

/// Why a single crop attempt failed.
///
/// A failure is terminal for that attempt; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CropError {
    /// The source bytes could not be decoded as an image.
    #[error("Failed to decode image: {0}")]
    Decode(String),
    /// The destination surface could not be created or drawn into.
    #[error("Failed to render crop: {0}")]
    Render(String),
    /// The cropped surface could not be serialized.
    #[error("Failed to encode crop: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Output of a backend crop: encoded bytes plus the surface size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Backends own all pixel work so the geometry in
/// [`operations`](super::operations) stays backend-agnostic and testable
/// with a recording mock.
pub trait ImageBackend: Send + Sync {
    /// Get source dimensions.
    fn identify(&self, source: &ImageSource) -> Result<Dimensions, CropError>;

    /// Copy `params.region` pixel-for-pixel into a new surface and encode it.
    fn crop(&self, source: &ImageSource, params: &CropParams) -> Result<EncodedImage, CropError>;
}
