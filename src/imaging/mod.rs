//! Aspect-ratio cropping, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Centered region** | [`calculate_centered_crop`] (pure) |
//! | **Region copy** | `crop_imm`, no resampling |
//! | **Encode → JPEG** | `JpegEncoder`, quality 90 by default |
//! | **Displayable** | base64 `data:` URI |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop geometry (unit testable)
//! - **Parameters**: Data structures describing a crop
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend
//! - **Cropper**: [`AspectCropper`], the configured entry point (sync + async)

pub mod backend;
mod calculations;
pub mod cropper;
pub mod data_uri;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{CropError, Dimensions, EncodedImage, ImageBackend};
pub use calculations::{CropRegion, aspect_from_ratio, calculate_centered_crop, matches_aspect};
pub use cropper::AspectCropper;
pub use data_uri::{DataUri, DataUriError, decode_data_uri, encode_data_uri, is_data_uri};
pub use operations::{CropConfig, crop_to_aspect, plan_crop};
pub use params::{CropParams, Quality};
pub use rust_backend::RustBackend;
