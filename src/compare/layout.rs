//! Pure geometry for the comparison view.
//!
//! Everything here is a plain function of the slider position and the
//! container size, so it is testable without pointers or pixels.

/// Width of the divider line, in container units.
pub const DIVIDER_WIDTH: f64 = 1.0;
/// Diameter of the round grab handle centered on the divider.
pub const HANDLE_SIZE: f64 = 40.0;
/// "Before" label is visible only above this position.
pub const BEFORE_LABEL_MIN: f64 = 15.0;
/// "After" label is visible only below this position.
pub const AFTER_LABEL_MAX: f64 = 85.0;

pub const MIN_POSITION: f64 = 0.0;
pub const MAX_POSITION: f64 = 100.0;
pub const DEFAULT_POSITION: f64 = 50.0;

/// Horizontal extent of the slider container in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub width: f64,
}

impl ContainerRect {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }
}

/// Clamp a position into `[0, 100]`. NaN maps to the default.
pub fn clamp_position(position: f64) -> f64 {
    if position.is_nan() {
        DEFAULT_POSITION
    } else {
        position.clamp(MIN_POSITION, MAX_POSITION)
    }
}

/// Map a pointer's client x to a slider position.
///
/// `None` when the container has no usable width; the caller keeps the
/// previous position.
pub fn position_from_pointer(client_x: f64, rect: ContainerRect) -> Option<f64> {
    if !(rect.width.is_finite() && rect.width > 0.0) || !client_x.is_finite() {
        return None;
    }
    Some(clamp_position(
        100.0 * (client_x - rect.left) / rect.width,
    ))
}

pub fn shows_before_label(position: f64) -> bool {
    position > BEFORE_LABEL_MIN
}

pub fn shows_after_label(position: f64) -> bool {
    position < AFTER_LABEL_MAX
}

/// An axis-aligned rectangle in container units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where everything goes for one frame of the comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareLayout {
    pub position: f64,
    /// Visible width of the "before" image, measured from the left edge.
    pub clip_width: f64,
    pub divider: Rect,
    pub handle: Rect,
    pub show_before_label: bool,
    pub show_after_label: bool,
}

/// Lay out a `width × height` container at `position`.
pub fn compute_layout(position: f64, width: f64, height: f64) -> CompareLayout {
    let position = clamp_position(position);
    let width = width.max(0.0);
    let height = height.max(0.0);
    let center_x = width * position / 100.0;
    let divider_x = (center_x - DIVIDER_WIDTH / 2.0).clamp(0.0, (width - DIVIDER_WIDTH).max(0.0));

    CompareLayout {
        position,
        clip_width: center_x,
        divider: Rect {
            x: divider_x,
            y: 0.0,
            width: DIVIDER_WIDTH.min(width),
            height,
        },
        handle: Rect {
            x: center_x - HANDLE_SIZE / 2.0,
            y: height / 2.0 - HANDLE_SIZE / 2.0,
            width: HANDLE_SIZE,
            height: HANDLE_SIZE,
        },
        show_before_label: shows_before_label(position),
        show_after_label: shows_after_label(position),
    }
}

/// Where an image lands when contain-fitted into a container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Scale `image` to fit entirely inside `container`, keeping its aspect
/// ratio, and center it. `None` if either has a zero side.
pub fn contain_fit(image: (u32, u32), container: (u32, u32)) -> Option<Placement> {
    let (iw, ih) = image;
    let (cw, ch) = container;
    if iw == 0 || ih == 0 || cw == 0 || ch == 0 {
        return None;
    }
    let scale = (f64::from(cw) / f64::from(iw)).min(f64::from(ch) / f64::from(ih));
    let width = ((f64::from(iw) * scale).round() as u32).clamp(1, cw);
    let height = ((f64::from(ih) * scale).round() as u32).clamp(1, ch);
    Some(Placement {
        x: (cw - width) / 2,
        y: (ch - height) / 2,
        width,
        height,
    })
}
