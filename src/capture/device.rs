//! Capture device abstraction.
//!
//! A [`CaptureDevice`] opens a [`MediaStream`]; a stream owns individually
//! stoppable [`MediaTrack`]s and can grab the current frame. A
//! [`PreviewSink`] is whatever renders the live stream. The session in
//! [`session`](super::session) owns the stream and drives these traits; tests
//! use the recording mocks in [`tests`].

use crate::types::Frame;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Why acquiring or reading a capture device failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or platform refused camera access.
    #[error("camera permission denied")]
    PermissionDenied,
    /// No matching device, or the device failed mid-acquisition.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
    /// A frame was requested while no stream is active.
    #[error("camera is not active")]
    NotActive,
}

impl CaptureError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied | Self::DeviceUnavailable(_) => {
                "Could not access camera. Please check permissions."
            }
            Self::NotActive => "Camera is not ready. Start the camera first.",
        }
    }
}

/// Which camera to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Front-facing (selfie) camera.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

impl Facing {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Environment => "environment",
        }
    }
}

/// What the session asks the device for. Dimensions are ideals, not minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    pub width: u32,
    pub height: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing: Facing::User,
            width: 1280,
            height: 960,
        }
    }
}

/// What the device actually delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    pub width: u32,
    pub height: u32,
}

/// One track of a stream. Stopping a track is permanent.
pub trait MediaTrack: Send {
    fn label(&self) -> &str;

    /// Stop the track, releasing the underlying hardware. Idempotent.
    fn stop(&mut self);

    fn set_enabled(&mut self, enabled: bool);

    /// Whether the track still holds the hardware.
    fn is_live(&self) -> bool;
}

/// A live stream handle.
pub trait MediaStream: Send {
    type Track: MediaTrack;

    fn tracks(&self) -> &[Self::Track];

    fn tracks_mut(&mut self) -> &mut [Self::Track];

    fn settings(&self) -> StreamSettings;

    /// Draw the current frame into a fresh raster.
    fn grab_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Whether any track still holds hardware.
    fn is_live(&self) -> bool {
        self.tracks().iter().any(MediaTrack::is_live)
    }

    /// Disable and stop every track.
    fn stop_all(&mut self) {
        for track in self.tracks_mut() {
            track.set_enabled(false);
            track.stop();
        }
    }
}

/// Something that can hand out camera streams.
pub trait CaptureDevice: Send {
    type Stream: MediaStream;

    /// Request a stream. May suspend while the platform asks for permission.
    fn open(
        &mut self,
        constraints: &StreamConstraints,
    ) -> impl Future<Output = Result<Self::Stream, CaptureError>> + Send;
}

/// Renders a live stream while the session is active.
pub trait PreviewSink: Send {
    fn attach(&mut self, settings: StreamSettings);
    fn detach(&mut self);
}
