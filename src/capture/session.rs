//! The capture session state machine.
//!
//! ```text
//! Idle ──start──▶ Requesting ──granted──▶ Active ──stop──▶ Idle
//!                      │                    │
//!                      └──denied/error──▶ Error ──stop/start──▶ Idle
//! ```
//!
//! The session owns at most one stream. Every path out of `Active` goes
//! through [`CaptureSession::stop`], which is idempotent and also runs on drop.

use super::device::{
    CaptureDevice, CaptureError, MediaStream, PreviewSink, StreamConstraints, StreamSettings,
};
use crate::types::{Frame, ImageSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Requesting,
    Active,
    Error,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Active => "active",
            Self::Error => "error",
        }
    }
}

pub struct CaptureSession<D: CaptureDevice> {
    device: D,
    constraints: StreamConstraints,
    state: SessionState,
    stream: Option<D::Stream>,
    sink: Option<Box<dyn PreviewSink>>,
    last_error: Option<CaptureError>,
}

impl<D: CaptureDevice> CaptureSession<D> {
    pub fn new(device: D, constraints: StreamConstraints) -> Self {
        Self {
            device,
            constraints,
            state: SessionState::Idle,
            stream: None,
            sink: None,
            last_error: None,
        }
    }

    /// Render the stream into `sink` whenever the session is active.
    pub fn with_sink(mut self, sink: impl PreviewSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// The error that put the session into [`SessionState::Error`], if any.
    pub fn last_error(&self) -> Option<&CaptureError> {
        self.last_error.as_ref()
    }

    /// Settings of the active stream.
    pub fn settings(&self) -> Option<StreamSettings> {
        self.stream.as_ref().map(MediaStream::settings)
    }

    pub fn constraints(&self) -> &StreamConstraints {
        &self.constraints
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Acquire a stream.
    ///
    /// Any stream already held is released first, so two streams are never
    /// live at once. On failure the session is left in
    /// [`SessionState::Error`] with nothing acquired; calling `start` again
    /// retries.
    ///
    /// If the returned future is dropped while waiting for the device, the
    /// session stays `Requesting` until the next `stop` or `start`.
    pub async fn start(&mut self) -> Result<StreamSettings, CaptureError> {
        if self.state != SessionState::Idle {
            self.stop();
        }
        self.state = SessionState::Requesting;
        self.last_error = None;
        log::debug!(
            "requesting {} camera at {}x{}",
            self.constraints.facing.as_str(),
            self.constraints.width,
            self.constraints.height
        );

        let mut stream = match self.device.open(&self.constraints).await {
            Ok(stream) => stream,
            Err(err) => return Err(self.fail(err)),
        };
        if !stream.is_live() {
            stream.stop_all();
            return Err(self.fail(CaptureError::DeviceUnavailable(
                "stream has no live tracks".to_string(),
            )));
        }

        let settings = stream.settings();
        if let Some(sink) = self.sink.as_mut() {
            sink.attach(settings);
        }
        self.stream = Some(stream);
        self.state = SessionState::Active;
        log::info!("camera active at {}x{}", settings.width, settings.height);
        Ok(settings)
    }

    fn fail(&mut self, err: CaptureError) -> CaptureError {
        log::warn!("camera start failed: {err}");
        self.state = SessionState::Error;
        self.last_error = Some(err.clone());
        err
    }

    /// Grab the current frame. Only valid while active; repeatable.
    pub fn snapshot(&mut self) -> Result<Frame, CaptureError> {
        match self.stream.as_mut() {
            Some(stream) if self.state == SessionState::Active => stream.grab_frame(),
            _ => Err(CaptureError::NotActive),
        }
    }

    /// [`snapshot`](Self::snapshot) wrapped as an image source.
    pub fn snapshot_source(&mut self) -> Result<ImageSource, CaptureError> {
        self.snapshot().map(ImageSource::LiveFrame)
    }

    /// Release everything and return to [`SessionState::Idle`].
    ///
    /// Safe to call in any state, any number of times.
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all();
            if let Some(sink) = self.sink.as_mut() {
                sink.detach();
            }
            log::debug!("camera stopped");
        }
        self.state = SessionState::Idle;
    }
}

impl<D: CaptureDevice> Drop for CaptureSession<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
