//! Before/after comparison with a draggable divider.
//!
//! - **Layout**: pure position and geometry math ([`compute_layout`])
//! - **Slider**: [`CompareSlider`], the pointer state machine
//! - **Render**: [`compose`], rasterizing a frame with the `image` crate

pub mod layout;
pub mod render;
pub mod slider;

pub use layout::{
    CompareLayout, ContainerRect, Placement, Rect, compute_layout, contain_fit,
    position_from_pointer,
};
pub use render::{BACKDROP, CompareError, compose, compose_images};
pub use slider::{
    CompareSlider, EventStatus, Labels, PointerEvent, PointerId, PointerKind, SliderState,
};
