//! Adapting the transformation service's response for display.
//!
//! The service answers with base64 JPEGs and a flag saying whether it fell
//! back to a simpler pipeline:
//!
//! ```json
//! { "images": [{ "image_base64": "...", "description": "Result" }], "used_fallback": false }
//! ```
//!
//! The first image is the transformed photo; the rest are intermediate
//! control images. Stored images are referenced by path and resolved against
//! the storage base URL.

use crate::imaging::data_uri::wrap_base64;
use crate::types::NormalizedImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type of every image the service returns.
pub const RESULT_MIME: &str = "image/jpeg";

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contains no images")]
    NoImages,
    #[error("result image has no data")]
    EmptyImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultImage {
    pub image_base64: String,
    #[serde(default)]
    pub description: String,
}

impl ResultImage {
    /// `data:` URI for the image, or `None` if the payload is empty.
    pub fn displayable(&self) -> Option<String> {
        (!self.image_base64.is_empty()).then(|| wrap_base64(RESULT_MIME, &self.image_base64))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub images: Vec<ResultImage>,
    #[serde(default)]
    pub used_fallback: bool,
}

impl TransformResponse {
    pub fn from_json(json: &str) -> Result<Self, ResponseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The transformed photo.
    pub fn main_image(&self) -> Option<&ResultImage> {
        self.images.first()
    }

    /// Intermediate images produced along the way.
    pub fn control_images(&self) -> &[ResultImage] {
        self.images.get(1..).unwrap_or_default()
    }
}

/// Two displayable references ready for the compare slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparePair {
    pub before: String,
    pub after: String,
}

impl ComparePair {
    /// Pair the submitted crop with the service's main result.
    pub fn from_response(
        submitted: &NormalizedImage,
        response: &TransformResponse,
    ) -> Result<Self, ResponseError> {
        let main = response.main_image().ok_or(ResponseError::NoImages)?;
        let after = main.displayable().ok_or(ResponseError::EmptyImage)?;
        if response.used_fallback {
            log::warn!("transformation used the fallback pipeline");
        }
        Ok(Self {
            before: submitted.displayable_ref().to_string(),
            after,
        })
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Join a stored object path onto the storage base URL.
///
/// Absolute `http(s)` URLs are returned unchanged.
pub fn storage_url(path: &str, base: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if is_absolute(path) {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.strip_prefix('/').unwrap_or(path)
    )
}

/// Resolve an image reference for display.
///
/// `http(s)` URLs and `data:` URIs pass through; anything else is a stored
/// object path.
pub fn resolve_image_url(url: &str, base: &str) -> String {
    if url.starts_with("data:") {
        return url.to_string();
    }
    storage_url(url, base)
}
