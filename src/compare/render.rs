//! Rasterize a comparison frame.
//!
//! The frame takes the size of the "after" image. Both images are
//! contain-fitted onto a muted backdrop of that size, the "before" layer is
//! copied over the "after" layer up to the divider, and the divider and grab
//! handle are drawn on top.

use super::layout::{CompareLayout, compute_layout, contain_fit};
use crate::imaging::data_uri::{DataUriError, decode_data_uri, is_data_uri};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage, imageops};
use thiserror::Error;

/// Fill behind letterboxed images.
pub const BACKDROP: Rgba<u8> = Rgba([241, 245, 249, 255]);
const DIVIDER_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const HANDLE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const HANDLE_BORDER: Rgba<u8> = Rgba([16, 185, 129, 255]);
const HANDLE_BORDER_WIDTH: f64 = 2.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// Only `data:` URIs can be rendered offline.
    #[error("cannot load image reference without network access: {0}")]
    UnsupportedRef(String),
    #[error("invalid data URI: {0}")]
    DataUri(#[from] DataUriError),
    #[error("Failed to decode {which} image: {message}")]
    Decode {
        which: &'static str,
        message: String,
    },
}

/// Decode a displayable reference into pixels.
pub fn load_displayable(uri: &str, which: &'static str) -> Result<RgbaImage, CompareError> {
    if !is_data_uri(uri) {
        return Err(CompareError::UnsupportedRef(truncate(uri)));
    }
    let data = decode_data_uri(uri)?;
    image::load_from_memory(&data.bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| CompareError::Decode {
            which,
            message: e.to_string(),
        })
}

fn truncate(uri: &str) -> String {
    const MAX: usize = 64;
    match uri.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &uri[..idx]),
        None => uri.to_string(),
    }
}

/// Render two displayable references at `position`.
pub fn compose(before: &str, after: &str, position: f64) -> Result<RgbaImage, CompareError> {
    let before = load_displayable(before, "before")?;
    let after = load_displayable(after, "after")?;
    Ok(compose_images(&before, &after, position))
}

/// Render two rasters at `position` in a frame the size of `after`.
///
/// Images of any size are accepted; each is scaled to fit and centered.
pub fn compose_images(before: &RgbaImage, after: &RgbaImage, position: f64) -> RgbaImage {
    let (width, height) = after.dimensions();
    let layout = compute_layout(position, f64::from(width), f64::from(height));

    let mut canvas = fit_onto_backdrop(after, (width, height));
    let clip = (layout.clip_width.round() as u32).min(width);
    if clip > 0 && height > 0 {
        let before = fit_onto_backdrop(before, (width, height));
        let visible = imageops::crop_imm(&before, 0, 0, clip, height).to_image();
        imageops::replace(&mut canvas, &visible, 0, 0);
    }
    draw_divider(&mut canvas, &layout);
    draw_handle(&mut canvas, &layout);
    canvas
}

fn fit_onto_backdrop(image: &RgbaImage, size: (u32, u32)) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(size.0, size.1, BACKDROP);
    let Some(place) = contain_fit(image.dimensions(), size) else {
        return canvas;
    };
    if (place.width, place.height) == image.dimensions() {
        imageops::overlay(&mut canvas, image, i64::from(place.x), i64::from(place.y));
    } else {
        let scaled = imageops::resize(image, place.width, place.height, FilterType::Lanczos3);
        imageops::overlay(&mut canvas, &scaled, i64::from(place.x), i64::from(place.y));
    }
    canvas
}

fn draw_divider(canvas: &mut RgbaImage, layout: &CompareLayout) {
    if canvas.width() == 0 {
        return;
    }
    let x = (layout.divider.x.floor() as u32).min(canvas.width() - 1);
    for y in 0..canvas.height() {
        canvas.put_pixel(x, y, DIVIDER_COLOR);
    }
}

fn draw_handle(canvas: &mut RgbaImage, layout: &CompareLayout) {
    let h = layout.handle;
    let radius = h.width / 2.0;
    let (cx, cy) = (h.x + radius, h.y + radius);

    let x0 = h.x.floor().max(0.0) as u32;
    let y0 = h.y.floor().max(0.0) as u32;
    let x1 = ((h.x + h.width).ceil().max(0.0) as u32).min(canvas.width());
    let y1 = ((h.y + h.height).ceil().max(0.0) as u32).min(canvas.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= radius - HANDLE_BORDER_WIDTH {
                canvas.put_pixel(x, y, HANDLE_FILL);
            } else if dist <= radius {
                canvas.put_pixel(x, y, HANDLE_BORDER);
            }
        }
    }
}
