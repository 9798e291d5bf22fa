//! Live camera capture.
//!
//! - **Device**: [`CaptureDevice`] / [`MediaStream`] / [`MediaTrack`] /
//!   [`PreviewSink`] traits at the platform seam
//! - **Session**: [`CaptureSession`], the Idle/Requesting/Active/Error state
//!   machine that owns the stream and guarantees its release
//! - **Still**: [`StillFrameDevice`], a hardware-free device serving one image

pub mod device;
pub mod session;
pub mod still;

pub use device::{
    CaptureDevice, CaptureError, Facing, MediaStream, MediaTrack, PreviewSink, StreamConstraints,
    StreamSettings,
};
pub use session::{CaptureSession, SessionState};
pub use still::StillFrameDevice;
