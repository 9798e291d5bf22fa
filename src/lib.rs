//! # capture-compare
//!
//! The client-side core of a photo transformation app: get a photo from a
//! file or a live camera, normalize it to a fixed aspect ratio, and compare
//! the original against the transformed result with a draggable divider.
//!
//! # Data Flow
//!
//! ```text
//! file bytes ─┐
//!             ├─▶ AspectCropper ─▶ NormalizedImage ─▶ (upload, external)
//! camera ─────┘                        │                     │
//!                                      │              TransformResponse
//!                                      ▼                     ▼
//!                                   before ──▶ ComparePair ◀── after
//!                                                  │
//!                                                  ▼
//!                                            CompareSlider
//!
//! StageSequencer runs alongside the upload, for display only.
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Centered aspect crop, JPEG encode, `data:` URIs |
//! | [`capture`] | Camera session state machine with guaranteed release |
//! | [`compare`] | Pointer-driven before/after slider, layout and compositing |
//! | [`stages`] | Cancellable timed progress stages on tokio |
//! | [`input`] | File/camera acquisition wired to the cropper and an observer |
//! | [`response`] | Transformation response → displayable URIs and a compare pair |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`types`] | Shared types (`ImageSource`, `NormalizedImage`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Geometry Separate From Pixels
//!
//! Crop regions are computed by pure functions in [`imaging`] and executed
//! by an [`imaging::ImageBackend`]. Geometry tests need no images, and the
//! crop pipeline is tested against a recording mock backend.
//!
//! ## Hardware Handles Are Owned
//!
//! [`capture::CaptureSession`] owns its stream as a field. Starting while
//! active releases the old stream first; `stop` is idempotent and also runs
//! on drop, so no exit path leaks a camera.
//!
//! ## Stages Are Decoupled From The Request
//!
//! [`stages::StageSequencer`] plays its stages to the end regardless of when
//! the real operation completes. It only stops early when cancelled or
//! dropped, after which its index never changes again.

pub mod capture;
pub mod compare;
pub mod config;
pub mod imaging;
pub mod input;
pub mod output;
pub mod response;
pub mod stages;
pub mod types;
