//! Pure Rust image backend on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::with_guessed_format` + `into_dimensions` (header only) |
//! | Decode (JPEG, PNG, WebP) | `ImageReader::decode` |
//! | Region copy | `DynamicImage::crop_imm` / `imageops::crop_imm` (no resampling) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{CropError, Dimensions, EncodedImage, ImageBackend};
use super::params::{CropParams, Quality};
use crate::types::ImageSource;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage, imageops};
use std::io::Cursor;

/// MIME type of every crop this backend produces.
pub const OUTPUT_MIME: &str = "image/jpeg";

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject anything the picker did not label as an image.
///
/// An empty MIME type is allowed through; the format is sniffed instead.
fn check_mime(mime_type: &str) -> Result<(), CropError> {
    if mime_type.is_empty()
        || mime_type
            .get(..6)
            .is_some_and(|p| p.eq_ignore_ascii_case("image/"))
    {
        Ok(())
    } else {
        Err(CropError::Decode(format!(
            "unsupported file type: {mime_type}"
        )))
    }
}

/// Open an in-memory reader, sniffing the format and falling back to the MIME hint.
fn open_reader<'a>(
    bytes: &'a [u8],
    mime_type: &str,
) -> Result<ImageReader<Cursor<&'a [u8]>>, CropError> {
    check_mime(mime_type)?;
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CropError::Decode(e.to_string()))?;
    if reader.format().is_none() {
        if let Some(format) = ImageFormat::from_mime_type(mime_type) {
            reader.set_format(format);
        }
    }
    if reader.format().is_none() {
        return Err(CropError::Decode("unrecognized image format".to_string()));
    }
    Ok(reader)
}

fn decode(bytes: &[u8], mime_type: &str) -> Result<DynamicImage, CropError> {
    open_reader(bytes, mime_type)?
        .decode()
        .map_err(|e| CropError::Decode(e.to_string()))
}

/// Copy the region of the source into a fresh RGB surface.
fn copy_region(source: &ImageSource, params: &CropParams) -> Result<RgbImage, CropError> {
    let r = params.region;
    match source {
        ImageSource::FileBytes { bytes, mime_type } => {
            let img = decode(bytes, mime_type)?;
            check_region(params, (img.width(), img.height()))?;
            Ok(img.crop_imm(r.x, r.y, r.width, r.height).to_rgb8())
        }
        ImageSource::LiveFrame(frame) => {
            check_region(params, frame.dimensions())?;
            let view = imageops::crop_imm(frame, r.x, r.y, r.width, r.height).to_image();
            Ok(DynamicImage::ImageRgba8(view).to_rgb8())
        }
    }
}

fn check_region(params: &CropParams, bounds: (u32, u32)) -> Result<(), CropError> {
    if params.region.fits_within(bounds) {
        Ok(())
    } else {
        let r = params.region;
        Err(CropError::Render(format!(
            "region {}x{}+{}+{} does not fit a {}x{} source",
            r.width, r.height, r.x, r.y, bounds.0, bounds.1
        )))
    }
}

/// Serialize as baseline JPEG at the given quality.
fn encode_jpeg(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, CropError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.value())
        .encode_image(img)
        .map_err(|e| CropError::Encode(e.to_string()))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, source: &ImageSource) -> Result<Dimensions, CropError> {
        let (width, height) = match source {
            ImageSource::FileBytes { bytes, mime_type } => open_reader(bytes, mime_type)?
                .into_dimensions()
                .map_err(|e| CropError::Decode(e.to_string()))?,
            ImageSource::LiveFrame(frame) => frame.dimensions(),
        };
        Ok(Dimensions { width, height })
    }

    fn crop(&self, source: &ImageSource, params: &CropParams) -> Result<EncodedImage, CropError> {
        let surface = copy_region(source, params)?;
        let bytes = encode_jpeg(&surface, params.quality)?;
        Ok(EncodedImage {
            bytes,
            mime_type: OUTPUT_MIME,
            width: surface.width(),
            height: surface.height(),
        })
    }
}
