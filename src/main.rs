use capture_compare::capture::{CaptureSession, SessionState, StillFrameDevice};
use capture_compare::compare::{CompareSlider, ContainerRect, PointerEvent, compose_images};
use capture_compare::compare::render::load_displayable;
use capture_compare::config::{self, AppConfig};
use capture_compare::imaging::{AspectCropper, CropConfig, encode_data_uri};
use capture_compare::input::{ImageInput, InputObserver};
use capture_compare::output;
use capture_compare::stages::{Stage, StageSequencer};
use capture_compare::types::{ImageSource, NormalizedImage};
use clap::{Parser, Subcommand};
use image::ImageFormat;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "capture-compare")]
#[command(about = "Crop, capture and compare photos from the command line")]
#[command(long_about = "\
Crop, capture and compare photos from the command line

Drives the acquisition and comparison core offline:

  crop        center-crop an image file to the configured aspect ratio
  capture     run a camera session against a still image and crop the snapshot
  compare     render a before/after frame with the divider at a position
  stages      play the progress stages in the terminal
  resolve-url turn a stored image path into a displayable URL

Run 'capture-compare gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults are used if it does not exist)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Center-crop an image to the configured aspect ratio
    Crop {
        input: PathBuf,
        /// Where to write the JPEG
        #[arg(long)]
        out: Option<PathBuf>,
        /// Override the aspect ratio, e.g. 16:9
        #[arg(long, value_parser = parse_aspect)]
        aspect: Option<(u32, u32)>,
    },
    /// Start a camera session on a still image, snapshot it and crop
    Capture {
        /// Image served as the camera stream
        #[arg(long)]
        frame: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render a before/after comparison to a PNG the size of the after image
    Compare {
        before: PathBuf,
        after: PathBuf,
        /// Divider position in percent; defaults to the configured start
        #[arg(long)]
        position: Option<f64>,
        #[arg(long, default_value = "compare.png")]
        out: PathBuf,
    },
    /// Play the progress stages
    Stages {
        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },
    /// Resolve an image reference from the service for display
    ResolveUrl { url: String },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn parse_aspect(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(':')
        .ok_or_else(|| format!("expected W:H, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("aspect sides must be non-zero".to_string());
    }
    Ok((w, h))
}

/// MIME type guessed from the file extension; empty lets the decoder sniff.
fn guess_mime(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or("")
}

/// Prints failures the way a UI would show them.
struct ConsoleObserver;

impl InputObserver for ConsoleObserver {
    fn on_image(&mut self, image: &NormalizedImage) {
        log::info!("normalized image {}x{}", image.width(), image.height());
    }

    fn on_error(&mut self, message: &str) {
        eprintln!("Error: {message}");
    }
}

fn write_output(image: &NormalizedImage, out: Option<&Path>) -> std::io::Result<()> {
    if let Some(path) = out {
        std::fs::write(path, image.binary())?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Crop { input, out, aspect } => {
            let app = config::load_config(&cli.config)?;
            let crop = match aspect {
                Some(ratio) => CropConfig::from_ratio(ratio, app.crop_config().quality)
                    .ok_or("aspect sides must be non-zero")?,
                None => app.crop_config(),
            };
            let bytes = std::fs::read(&input)?;
            let label = format!("{} ({} bytes)", input.display(), bytes.len());
            let source = ImageSource::file(bytes, guess_mime(&input));
            let image = AspectCropper::new(crop).crop(source).await?;
            write_output(&image, out.as_deref())?;
            output::print_crop_result(&label, &image, out.as_deref());
        }
        Command::Capture { frame, out } => {
            let app = config::load_config(&cli.config)?;
            let device = StillFrameDevice::open_file(&frame)?;
            let constraints = app.stream_constraints();
            let mut input = ImageInput::new(
                AspectCropper::new(app.crop_config()),
                CaptureSession::new(device, constraints),
                ConsoleObserver,
            );

            output::print_capture_state(SessionState::Requesting, &constraints, None);
            input.start_camera().await?;
            let camera = input.camera();
            output::print_capture_state(camera.state(), &constraints, camera.settings());

            let image = input.capture().await?.clone();
            let camera = input.camera();
            output::print_capture_state(camera.state(), &constraints, camera.settings());

            write_output(&image, out.as_deref())?;
            output::print_crop_result(
                &format!("camera frame from {}", frame.display()),
                &image,
                out.as_deref(),
            );
        }
        Command::Compare {
            before,
            after,
            position,
            out,
        } => {
            let app = config::load_config(&cli.config)?;
            let before = load_displayable(&file_data_uri(&before)?, "before")?;
            let after = load_displayable(&file_data_uri(&after)?, "after")?;

            let mut slider = CompareSlider::new(app.slider.initial_position, app.labels());
            let width = f64::from(after.width());
            if let Some(p) = position {
                let rect = ContainerRect::new(0.0, width);
                let pointer = PointerEvent::mouse(width * p / 100.0);
                slider.pointer_down(pointer, rect);
                slider.pointer_up(pointer);
            }

            let canvas = compose_images(&before, &after, slider.position());
            canvas.save_with_format(&out, ImageFormat::Png)?;
            let layout = slider.layout(width, f64::from(after.height()));
            output::print_compare_layout(&layout, slider.labels(), width);
            println!("Output: {}", out.display());
        }
        Command::Stages { speed } => {
            let app = config::load_config(&cli.config)?;
            run_stages(&app, speed).await?;
        }
        Command::ResolveUrl { url } => {
            let app = config::load_config(&cli.config)?;
            println!("{}", app.resolve_image_url(&url));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Read an image file into a `data:` URI, as a browser file reader would.
fn file_data_uri(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(encode_data_uri(guess_mime(path), &bytes))
}

async fn run_stages(app: &AppConfig, speed: f64) -> Result<(), Box<dyn std::error::Error>> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err("speed must be a positive number".into());
    }
    let stages: Vec<Stage> = app
        .stages
        .steps
        .iter()
        .map(|s| Stage {
            duration_ms: (s.duration_ms as f64 / speed).round() as u64,
            ..s.clone()
        })
        .collect();

    let sequencer = StageSequencer::start(stages)?;
    let mut progress = sequencer.subscribe();
    loop {
        let current = *progress.borrow_and_update();
        output::print_stage_progress(sequencer.stages(), current);
        if current.is_finished() || progress.changed().await.is_err() {
            break;
        }
    }
    Ok(())
}
