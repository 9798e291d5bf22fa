//! Pure calculation functions for crop geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// A rectangular region of a source raster, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Whether the region lies entirely inside a `(width, height)` raster.
    pub fn fits_within(&self, bounds: (u32, u32)) -> bool {
        let (w, h) = bounds;
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(w)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(h)
    }
}

/// Convert an integer `(width, height)` ratio into a float aspect.
///
/// Returns `None` if either side is zero.
pub fn aspect_from_ratio(ratio: (u32, u32)) -> Option<f64> {
    let (w, h) = ratio;
    if w == 0 || h == 0 {
        return None;
    }
    Some(f64::from(w) / f64::from(h))
}

/// Compute the centered crop of `source` that has the `target` aspect ratio.
///
/// The longer side (relative to the target) is trimmed equally on both ends;
/// the other side is kept whole. Fractional sizes are rounded to the nearest
/// pixel and clamped to `[1, source side]`, offsets are floored.
///
/// Returns `None` for an empty source or a target aspect that is not a
/// finite positive number.
///
/// # Examples
/// ```
/// # use capture_compare::imaging::calculate_centered_crop;
/// // 1600x900 → 4:3: full height, 200px trimmed off each side
/// let region = calculate_centered_crop((1600, 900), 4.0 / 3.0).unwrap();
/// assert_eq!((region.x, region.y, region.width, region.height), (200, 0, 1200, 900));
/// ```
pub fn calculate_centered_crop(source: (u32, u32), target: f64) -> Option<CropRegion> {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 || !target.is_finite() || target <= 0.0 {
        return None;
    }

    let src_aspect = f64::from(src_w) / f64::from(src_h);

    if src_aspect > target {
        // Source is wider: keep the height, trim the sides
        let width = round_clamped(f64::from(src_h) * target, src_w);
        Some(CropRegion {
            x: (src_w - width) / 2,
            y: 0,
            width,
            height: src_h,
        })
    } else {
        // Source is taller (or equal): keep the width, trim top and bottom
        let height = round_clamped(f64::from(src_w) / target, src_h);
        Some(CropRegion {
            x: 0,
            y: (src_h - height) / 2,
            width: src_w,
            height,
        })
    }
}

fn round_clamped(value: f64, max: u32) -> u32 {
    (value.round() as u32).clamp(1, max)
}

/// Whether `(width, height)` matches `target` within one pixel on either axis.
pub fn matches_aspect(dims: (u32, u32), target: f64) -> bool {
    let (w, h) = (f64::from(dims.0), f64::from(dims.1));
    (w - h * target).abs() <= 1.0 || (h - w / target).abs() <= 1.0
}
