//! A capture device that streams a single still image.
//!
//! Lets the session run without camera hardware: the CLI `capture` command
//! and the integration tests drive [`CaptureSession`](super::CaptureSession)
//! with it.

use super::device::{
    CaptureDevice, CaptureError, MediaStream, MediaTrack, StreamConstraints, StreamSettings,
};
use crate::types::Frame;
use std::path::Path;
use std::sync::Arc;

pub struct StillTrack {
    live: bool,
    enabled: bool,
}

impl MediaTrack for StillTrack {
    fn label(&self) -> &str {
        "still frame"
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

pub struct StillStream {
    frame: Arc<Frame>,
    track: [StillTrack; 1],
}

impl MediaStream for StillStream {
    type Track = StillTrack;

    fn tracks(&self) -> &[StillTrack] {
        &self.track
    }

    fn tracks_mut(&mut self) -> &mut [StillTrack] {
        &mut self.track
    }

    fn settings(&self) -> StreamSettings {
        StreamSettings {
            width: self.frame.width(),
            height: self.frame.height(),
        }
    }

    fn grab_frame(&mut self) -> Result<Frame, CaptureError> {
        if !self.track[0].live {
            return Err(CaptureError::DeviceUnavailable("stream ended".to_string()));
        }
        Ok(Frame::clone(&self.frame))
    }
}

/// Device whose every stream yields the same frame.
///
/// Constraints are recorded in logs but otherwise ignored; the frame is
/// delivered at its native size, as a real camera may do.
pub struct StillFrameDevice {
    frame: Arc<Frame>,
}

impl StillFrameDevice {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame: Arc::new(frame),
        }
    }

    /// Load the frame from an image file.
    pub fn open_file(path: &Path) -> Result<Self, CaptureError> {
        let img = image::open(path)
            .map_err(|e| CaptureError::DeviceUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self::new(img.to_rgba8()))
    }
}

impl CaptureDevice for StillFrameDevice {
    type Stream = StillStream;

    async fn open(&mut self, constraints: &StreamConstraints) -> Result<StillStream, CaptureError> {
        log::debug!(
            "still device: {} camera requested at {}x{}, serving {}x{}",
            constraints.facing.as_str(),
            constraints.width,
            constraints.height,
            self.frame.width(),
            self.frame.height()
        );
        if self.frame.width() == 0 || self.frame.height() == 0 {
            return Err(CaptureError::DeviceUnavailable("empty frame".to_string()));
        }
        Ok(StillStream {
            frame: Arc::clone(&self.frame),
            track: [StillTrack {
                live: true,
                enabled: true,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[tokio::test]
    async fn still_stream_serves_its_frame_until_stopped() {
        let mut device = StillFrameDevice::new(Frame::from_pixel(8, 6, Rgba([1, 2, 3, 255])));
        let mut stream = device.open(&StreamConstraints::default()).await.unwrap();
        assert_eq!(stream.settings(), StreamSettings { width: 8, height: 6 });

        let frame = stream.grab_frame().unwrap();
        assert_eq!(frame.get_pixel(7, 5), &Rgba([1, 2, 3, 255]));

        stream.stop_all();
        assert!(!stream.is_live());
        assert!(stream.grab_frame().is_err());
    }

    #[tokio::test]
    async fn empty_frame_is_unavailable() {
        let mut device = StillFrameDevice::new(Frame::new(0, 0));
        let err = device.open(&StreamConstraints::default()).await.err();
        assert!(matches!(err, Some(CaptureError::DeviceUnavailable(_))));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = StillFrameDevice::open_file(&dir.path().join("nope.png")).err();
        assert!(matches!(err, Some(CaptureError::DeviceUnavailable(_))));
    }
}
