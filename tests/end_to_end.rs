//! End-to-end scenarios through the public API.

use capture_compare::capture::{
    CaptureDevice, CaptureError, CaptureSession, MediaStream, MediaTrack, SessionState,
    StillFrameDevice, StreamConstraints, StreamSettings,
};
use capture_compare::compare::{
    BACKDROP, CompareSlider, ContainerRect, EventStatus, PointerEvent, compose,
};
use capture_compare::imaging::{AspectCropper, CropConfig, CropError, Quality, decode_data_uri};
use capture_compare::response::{ComparePair, TransformResponse};
use capture_compare::stages::{StageSequencer, default_stages};
use capture_compare::types::{Frame, ImageSource};
use image::{ImageFormat, Rgb, RgbImage, Rgba};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn png(img: &RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Dark margins of `margin` px on the left/right (or top/bottom), bright middle.
fn framed(width: u32, height: u32, margin_x: u32, margin_y: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let inside_x = x >= margin_x && x < width - margin_x;
        let inside_y = y >= margin_y && y < height - margin_y;
        if inside_x && inside_y {
            Rgb([240, 240, 240])
        } else {
            Rgb([10, 10, 10])
        }
    })
}

fn cropper() -> AspectCropper {
    AspectCropper::new(CropConfig::from_ratio((4, 3), Quality::new(90)).unwrap())
}

// Scenario A: 1600x900 → 4:3 trims 200 px from each side.
#[tokio::test]
async fn landscape_upload_trims_sides() {
    let source = ImageSource::file(png(&framed(1600, 900, 200, 0)), "image/png");
    let image = cropper().crop(source).await.unwrap();
    assert_eq!(image.dimensions(), (1200, 900));
    assert_eq!(image.mime_type(), "image/jpeg");

    let decoded = image::load_from_memory(image.binary()).unwrap().to_rgb8();
    for (x, y) in [(2, 450), (1197, 450), (600, 2), (600, 897)] {
        let Rgb([r, _, _]) = *decoded.get_pixel(x, y);
        assert!(r > 200, "({x},{y}) should be inside the bright region, got {r}");
    }

    let uri = decode_data_uri(image.displayable_ref()).unwrap();
    assert_eq!(uri.mime_type, "image/jpeg");
    assert_eq!(uri.bytes, image.binary());
}

// Scenario B: 900x1600 → 4:3 gives 900x675, vertically centered.
#[tokio::test]
async fn portrait_upload_trims_top_and_bottom() {
    let source = ImageSource::file(png(&framed(900, 1600, 0, 462)), "image/png");
    let image = cropper().crop(source).await.unwrap();
    assert_eq!(image.dimensions(), (900, 675));

    let decoded = image::load_from_memory(image.binary()).unwrap().to_rgb8();
    let Rgb([r, _, _]) = *decoded.get_pixel(450, 337);
    assert!(r > 200);
}

#[test]
fn non_image_upload_is_rejected() {
    let err = cropper()
        .crop_blocking(&ImageSource::file(b"hello".to_vec(), "text/plain"))
        .unwrap_err();
    assert!(matches!(err, CropError::Decode(_)));
}

// Scenario C: a drag from -50 to width+50 sweeps 0 → 100 monotonically.
#[test]
fn drag_sweep_is_clamped_and_monotonic() {
    let rect = ContainerRect::new(30.0, 600.0);
    let mut slider = CompareSlider::default();

    assert_eq!(
        slider.pointer_down(PointerEvent::touch(7, rect.left - 50.0), rect),
        EventStatus::Captured
    );
    let mut positions = vec![slider.position()];
    let mut x = rect.left - 50.0;
    while x <= rect.left + rect.width + 50.0 {
        slider.pointer_move(PointerEvent::touch(7, x), rect);
        positions.push(slider.position());
        x += 13.0;
    }
    slider.pointer_up(PointerEvent::touch(7, x));

    assert_eq!(positions.first(), Some(&0.0));
    assert_eq!(positions.last(), Some(&100.0));
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    assert!(!slider.is_dragging());
}

/// A device whose tracks report into a shared live counter.
#[derive(Clone, Default)]
struct CountingDevice {
    live: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
}

struct CountingTrack {
    live: Arc<AtomicUsize>,
    running: bool,
}

impl MediaTrack for CountingTrack {
    fn label(&self) -> &str {
        "counting"
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn set_enabled(&mut self, _enabled: bool) {}

    fn is_live(&self) -> bool {
        self.running
    }
}

struct CountingStream {
    tracks: Vec<CountingTrack>,
}

impl MediaStream for CountingStream {
    type Track = CountingTrack;

    fn tracks(&self) -> &[CountingTrack] {
        &self.tracks
    }

    fn tracks_mut(&mut self) -> &mut [CountingTrack] {
        &mut self.tracks
    }

    fn settings(&self) -> StreamSettings {
        StreamSettings {
            width: 1280,
            height: 960,
        }
    }

    fn grab_frame(&mut self) -> Result<Frame, CaptureError> {
        Ok(Frame::new(1280, 960))
    }
}

impl CaptureDevice for CountingDevice {
    type Stream = CountingStream;

    async fn open(&mut self, _constraints: &StreamConstraints) -> Result<CountingStream, CaptureError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let tracks = (0..2)
            .map(|_| {
                self.live.fetch_add(1, Ordering::SeqCst);
                CountingTrack {
                    live: Arc::clone(&self.live),
                    running: true,
                }
            })
            .collect();
        Ok(CountingStream { tracks })
    }
}

// Scenario D: start → start → stop leaves zero live tracks.
#[tokio::test]
async fn restarting_camera_leaves_no_live_tracks() {
    let device = CountingDevice::default();
    let live = Arc::clone(&device.live);
    let mut session = CaptureSession::new(device.clone(), StreamConstraints::default());

    session.start().await.unwrap();
    assert_eq!(live.load(Ordering::SeqCst), 2);
    session.start().await.unwrap();
    assert_eq!(live.load(Ordering::SeqCst), 2);
    session.stop();

    assert_eq!(live.load(Ordering::SeqCst), 0);
    assert_eq!(device.opened.load(Ordering::SeqCst), 2);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn still_camera_capture_is_cropped() {
    let frame = Frame::from_pixel(1600, 900, Rgba([80, 120, 160, 255]));
    let mut session = CaptureSession::new(StillFrameDevice::new(frame), StreamConstraints::default());
    session.start().await.unwrap();
    let source = session.snapshot_source().unwrap();
    session.stop();

    let image = cropper().crop(source).await.unwrap();
    assert_eq!(image.dimensions(), (1200, 900));
}

#[tokio::test]
async fn crop_then_compare_against_service_result() {
    let submitted = cropper()
        .crop(ImageSource::file(png(&framed(800, 600, 0, 0)), "image/png"))
        .await
        .unwrap();

    // The service echoes a darker version of the same size.
    let mut result = Cursor::new(Vec::new());
    RgbImage::from_pixel(800, 600, Rgb([0, 90, 0]))
        .write_to(&mut result, ImageFormat::Jpeg)
        .unwrap();
    let json = format!(
        r#"{{"images": [{{"image_base64": "{}", "description": "Result"}}], "used_fallback": false}}"#,
        base64_encode(result.get_ref())
    );

    let response = TransformResponse::from_json(&json).unwrap();
    let pair = ComparePair::from_response(&submitted, &response).unwrap();
    let frame = compose(&pair.before, &pair.after, 25.0).unwrap();
    assert_eq!(frame.dimensions(), (800, 600));

    let left = frame.get_pixel(20, 20);
    let right = frame.get_pixel(700, 20);
    assert!(left[0] > 200, "before side should be bright: {left:?}");
    assert!(right[0] < 40 && right[1] > 60, "after side should be green: {right:?}");
}

// The service answers at a fixed 768x768 regardless of the crop size.
#[tokio::test]
async fn compare_fits_a_square_service_result() {
    let submitted = cropper()
        .crop(ImageSource::file(png(&framed(1600, 900, 200, 0)), "image/png"))
        .await
        .unwrap();
    assert_eq!(submitted.dimensions(), (1200, 900));

    let mut result = Cursor::new(Vec::new());
    RgbImage::from_pixel(768, 768, Rgb([0, 90, 0]))
        .write_to(&mut result, ImageFormat::Jpeg)
        .unwrap();
    let json = format!(
        r#"{{"images": [{{"image_base64": "{}"}}]}}"#,
        base64_encode(result.get_ref())
    );

    let response = TransformResponse::from_json(&json).unwrap();
    let pair = ComparePair::from_response(&submitted, &response).unwrap();
    let frame = compose(&pair.before, &pair.after, 50.0).unwrap();
    assert_eq!(frame.dimensions(), (768, 768));

    // before side: letterbox band above the crop, bright crop below it
    assert_eq!(*frame.get_pixel(100, 20), BACKDROP);
    assert!(frame.get_pixel(100, 384)[0] > 200);
    // after side is the service image edge to edge
    let after = frame.get_pixel(600, 20);
    assert!(after[0] < 40 && after[1] > 60, "{after:?}");
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[tokio::test(start_paused = true)]
async fn stages_play_to_the_end_and_freeze_on_cancel() {
    let full = StageSequencer::start(default_stages()).unwrap();
    let done = full.wait().await;
    assert_eq!(done.current, 6);

    let mut partial = StageSequencer::start(default_stages()).unwrap();
    tokio::time::sleep(Duration::from_millis(7000)).await;
    assert_eq!(partial.current_stage_name(), Some("Enhancing natural glow"));
    partial.cancel();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(partial.current_index(), 2);
}
