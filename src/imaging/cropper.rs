//! The aspect cropper: a configured backend plus the target geometry.
//!
//! [`AspectCropper::crop_blocking`] runs on the caller's thread.
//! [`AspectCropper::crop`] moves the decode/encode work onto tokio's blocking
//! pool so an event loop driving capture and stage timers never stalls.

use super::backend::{CropError, ImageBackend};
use super::operations::{CropConfig, Result, crop_to_aspect};
use super::rust_backend::RustBackend;
use crate::types::{ImageSource, NormalizedImage};
use std::sync::Arc;

pub struct AspectCropper<B = RustBackend> {
    backend: Arc<B>,
    config: CropConfig,
}

impl AspectCropper<RustBackend> {
    pub fn new(config: CropConfig) -> Self {
        Self::with_backend(RustBackend::new(), config)
    }
}

impl Default for AspectCropper<RustBackend> {
    fn default() -> Self {
        Self::new(CropConfig::default())
    }
}

impl<B> Clone for AspectCropper<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config,
        }
    }
}

impl<B: ImageBackend + 'static> AspectCropper<B> {
    pub fn with_backend(backend: B, config: CropConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Crop synchronously.
    pub fn crop_blocking(&self, source: &ImageSource) -> Result<NormalizedImage> {
        crop_to_aspect(self.backend.as_ref(), source, &self.config)
    }

    /// Crop on tokio's blocking pool, or inline when polled outside a runtime.
    ///
    /// A panicking or cancelled worker surfaces as [`CropError::Render`].
    pub async fn crop(&self, source: ImageSource) -> Result<NormalizedImage> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::debug!("no tokio runtime, cropping inline");
            return self.crop_blocking(&source);
        };
        let backend = Arc::clone(&self.backend);
        let config = self.config;
        handle
            .spawn_blocking(move || crop_to_aspect(backend.as_ref(), &source, &config))
            .await
            .map_err(|e| CropError::Render(format!("crop worker failed: {e}")))?
    }
}
