//! Image acquisition boundary: file selection and camera capture, both
//! normalized through the cropper.
//!
//! Results and user-facing failures are reported to an [`InputObserver`].
//! Errors are also returned so callers can branch on them, but the observer
//! is the single place a UI needs to listen.

use crate::capture::{CaptureDevice, CaptureError, CaptureSession, StreamSettings};
use crate::imaging::{AspectCropper, CropError, ImageBackend, RustBackend};
use crate::types::{ImageSource, NormalizedImage};
use thiserror::Error;

/// Shown when a selected file cannot be cropped.
pub const FILE_FAILED: &str = "Failed to process image";
/// Shown when a camera snapshot cannot be cropped.
pub const CAPTURE_FAILED: &str = "Failed to process captured image";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error(transparent)]
    Crop(#[from] CropError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Receives what the input produces.
pub trait InputObserver {
    /// A new normalized image replaced the current one.
    fn on_image(&mut self, image: &NormalizedImage);

    /// Something failed; `message` is ready to show to the user.
    fn on_error(&mut self, message: &str);

    /// The current image was cleared.
    fn on_clear(&mut self) {}
}

pub struct ImageInput<D: CaptureDevice, O: InputObserver, B = RustBackend> {
    cropper: AspectCropper<B>,
    camera: CaptureSession<D>,
    observer: O,
    current: Option<NormalizedImage>,
}

impl<D, O, B> ImageInput<D, O, B>
where
    D: CaptureDevice,
    O: InputObserver,
    B: ImageBackend + 'static,
{
    pub fn new(cropper: AspectCropper<B>, camera: CaptureSession<D>, observer: O) -> Self {
        Self {
            cropper,
            camera,
            observer,
            current: None,
        }
    }

    /// The most recent normalized image.
    pub fn current(&self) -> Option<&NormalizedImage> {
        self.current.as_ref()
    }

    pub fn camera(&self) -> &CaptureSession<D> {
        &self.camera
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Crop a user-selected file.
    ///
    /// On failure the previous image, if any, stays current.
    pub async fn select_file(
        &mut self,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<&NormalizedImage, InputError> {
        let source = ImageSource::file(bytes, mime_type);
        self.normalize(source, FILE_FAILED).await
    }

    pub async fn start_camera(&mut self) -> Result<StreamSettings, InputError> {
        self.camera.start().await.map_err(|err| {
            self.observer.on_error(err.user_message());
            InputError::from(err)
        })
    }

    pub fn stop_camera(&mut self) {
        self.camera.stop();
    }

    /// Snapshot the camera, release it, and crop the frame.
    pub async fn capture(&mut self) -> Result<&NormalizedImage, InputError> {
        let source = match self.camera.snapshot_source() {
            Ok(source) => source,
            Err(err) => {
                self.observer.on_error(err.user_message());
                return Err(err.into());
            }
        };
        self.camera.stop();
        self.normalize(source, CAPTURE_FAILED).await
    }

    /// Drop the current image.
    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            self.observer.on_clear();
        }
    }

    async fn normalize(
        &mut self,
        source: ImageSource,
        failure_message: &str,
    ) -> Result<&NormalizedImage, InputError> {
        let label = source.describe();
        match self.cropper.crop(source).await {
            Ok(image) => {
                self.observer.on_image(&image);
                Ok(self.current.insert(image))
            }
            Err(err) => {
                log::warn!("{failure_message} ({label}): {err}");
                self.observer.on_error(failure_message);
                Err(err.into())
            }
        }
    }
}
