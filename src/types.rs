//! Shared types passed between acquisition, cropping and comparison.

use image::RgbaImage;

/// A raw frame grabbed from a capture device.
pub type Frame = RgbaImage;

/// Where an image came from, before normalization.
///
/// Immutable once captured: the cropper only ever reads it.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Bytes of a user-selected file, with the MIME type the picker reported.
    FileBytes { bytes: Vec<u8>, mime_type: String },
    /// A snapshot of the live camera stream.
    LiveFrame(Frame),
}

impl ImageSource {
    pub fn file(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self::FileBytes {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Short human label for logs and CLI output.
    pub fn describe(&self) -> String {
        match self {
            Self::FileBytes { bytes, mime_type } => {
                format!("{} file ({} bytes)", display_mime(mime_type), bytes.len())
            }
            Self::LiveFrame(frame) => {
                format!("camera frame {}x{}", frame.width(), frame.height())
            }
        }
    }
}

fn display_mime(mime_type: &str) -> &str {
    if mime_type.is_empty() {
        "untyped"
    } else {
        mime_type
    }
}

/// A cropped, encoded image ready to upload and to display.
///
/// Produced by the cropper and never mutated afterwards; fields are read
/// through accessors so the aspect invariant cannot be broken by the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    binary: Vec<u8>,
    displayable: String,
    width: u32,
    height: u32,
    mime_type: &'static str,
}

impl NormalizedImage {
    /// Name attached to the binary when it is sent as multipart form data.
    pub const FILE_NAME: &'static str = "cropped-image.jpg";

    pub(crate) fn new(
        binary: Vec<u8>,
        displayable: String,
        width: u32,
        height: u32,
        mime_type: &'static str,
    ) -> Self {
        Self {
            binary,
            displayable,
            width,
            height,
            mime_type,
        }
    }

    /// Encoded image bytes.
    pub fn binary(&self) -> &[u8] {
        &self.binary
    }

    /// Consume the image, keeping only the encoded bytes.
    pub fn into_binary(self) -> Vec<u8> {
        self.binary
    }

    /// URI usable directly as an image source (a `data:` URI).
    pub fn displayable_ref(&self) -> &str {
        &self.displayable
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn file_name(&self) -> &'static str {
        Self::FILE_NAME
    }
}
