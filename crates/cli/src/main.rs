use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};

use posecapture_core::camera::domain::camera::Camera;
use posecapture_core::camera::infrastructure::image_sequence_camera::ImageSequenceCamera;
use posecapture_core::camera::infrastructure::synthetic_camera::SyntheticCamera;
use posecapture_core::capture::domain::capture_status_machine::CaptureStatus;
use posecapture_core::capture::domain::geometry_validator::GeometryValidator;
use posecapture_core::capture::domain::pose_step::{CapturedPoseSet, PoseStep};
use posecapture_core::capture::domain::roi_bounds::RoiBounds;
use posecapture_core::detection::domain::detected_face::DetectedFace;
use posecapture_core::detection::infrastructure::scripted_face_detector::ScriptedFaceDetector;
use posecapture_core::feedback::domain::capture_feedback::CaptureFeedback;
use posecapture_core::feedback::infrastructure::log_capture_feedback::LogCaptureFeedback;
use posecapture_core::handoff::domain::pose_set_handoff::{HandoffError, PoseSetHandoff};
use posecapture_core::handoff::infrastructure::image_file_handoff::ImageFileHandoff;
use posecapture_core::pipeline::capture_session::CaptureSession;
use posecapture_core::pipeline::detection_loop::{CaptureHandle, DetectionLoop, LoopOutcome};
use posecapture_core::shared::capture_config::CaptureConfig;

/// Guided front/left/right face capture driven by scripted detections.
#[derive(Parser)]
#[command(name = "posecapture")]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConfigOverrides {
    /// Config file (defaults to the user config, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimum time between detector calls, in milliseconds.
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    /// Delay before the first detector call, in milliseconds.
    #[arg(long, global = true)]
    startup_delay_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a capture session against a detection script.
    Run(RunArgs),
    /// Evaluate a single detection and print the verdict as JSON.
    Validate(ValidateArgs),
    /// Print the effective config as JSON.
    Config {
        /// Also write it to the user config path.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// JSON array of per-frame detections.
    #[arg(long)]
    script: PathBuf,

    /// Directory of images to use as camera frames.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Directory to write the captured poses to.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Capture automatically whenever the face is ready.
    #[arg(long)]
    auto_capture: bool,

    /// Synthetic frame width when --frames is not given.
    #[arg(long, default_value = "720")]
    width: u32,

    /// Synthetic frame height when --frames is not given.
    #[arg(long, default_value = "1280")]
    height: u32,

    /// Stop the session after this many seconds.
    #[arg(long, default_value = "60")]
    timeout_secs: u64,
}

#[derive(Args)]
struct ValidateArgs {
    /// JSON file holding one detected face.
    face: PathBuf,

    /// Pose to validate against: front, left or right.
    #[arg(long, default_value = "front")]
    step: String,

    #[arg(long, default_value = "720")]
    width: u32,

    #[arg(long, default_value = "1280")]
    height: u32,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli.overrides)?;

    match cli.command {
        Command::Run(args) => run_session(config, &args),
        Command::Validate(args) => run_validate(config, &args),
        Command::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if save {
                let path = CaptureConfig::default_path()
                    .ok_or("could not determine the user config directory")?;
                config.save(&path)?;
                eprintln!("Saved to {}", path.display());
            }
            Ok(())
        }
    }
}

fn resolve_config(
    overrides: &ConfigOverrides,
) -> Result<CaptureConfig, Box<dyn std::error::Error>> {
    let mut config = match &overrides.config {
        Some(path) => CaptureConfig::load(path)?,
        None => CaptureConfig::load_default()?,
    };
    if let Some(ms) = overrides.interval_ms {
        config.sample_interval_ms = ms;
    }
    if let Some(ms) = overrides.startup_delay_ms {
        config.startup_delay_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

/// Logs progress and, when given a handle, presses the shutter on `ready`.
struct CliFeedback {
    log: LogCaptureFeedback,
    auto_capture: Option<CaptureHandle>,
}

impl CaptureFeedback for CliFeedback {
    fn status_entered(&mut self, status: CaptureStatus, step: PoseStep) {
        self.log.status_entered(status, step);
        if status == CaptureStatus::Ready {
            if let Some(handle) = &self.auto_capture {
                handle.request_capture();
            }
        }
    }

    fn pose_advanced(&mut self, captured: PoseStep, next: PoseStep) {
        self.log.pose_advanced(captured, next);
    }

    fn session_completed(&mut self) {
        self.log.session_completed();
    }

    fn summary(&self) {
        self.log.summary();
    }
}

/// Used when no output directory is given.
struct DiscardHandoff;

impl PoseSetHandoff for DiscardHandoff {
    fn hand_off(&mut self, poses: &CapturedPoseSet) -> Result<(), HandoffError> {
        log::info!("Captured {} poses (not saved)", poses.len());
        Ok(())
    }
}

fn run_session(config: CaptureConfig, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let detector = ScriptedFaceDetector::from_file(&args.script)?;
    eprintln!("Loaded {} scripted detections", detector.len());

    let camera: Box<dyn Camera> = match &args.frames {
        Some(dir) => Box::new(ImageSequenceCamera::open(dir)?),
        None => Box::new(SyntheticCamera::new(args.width, args.height)),
    };
    let handoff: Box<dyn PoseSetHandoff> = match &args.output {
        Some(dir) => Box::new(ImageFileHandoff::new(dir)),
        None => Box::new(DiscardHandoff),
    };

    let (handle, commands) = CaptureHandle::channel();
    let feedback = CliFeedback {
        log: LogCaptureFeedback::new(),
        auto_capture: args.auto_capture.then(|| handle.clone()),
    };
    let session = CaptureSession::new(config, Box::new(feedback), Instant::now());
    let running =
        DetectionLoop::new(session, camera, Box::new(detector), handoff, commands).spawn();

    let timeout = Duration::from_secs(args.timeout_secs);
    let watchdog = handle.clone();
    thread::spawn(move || {
        thread::sleep(timeout);
        watchdog.shutdown();
    });

    let outcome = running
        .join()
        .map_err(|_| "detection loop panicked")??;
    match outcome {
        LoopOutcome::Completed(poses) => {
            eprintln!("Captured {} poses", poses.len());
            if let Some(dir) = &args.output {
                print_written(dir, &poses);
            }
            Ok(())
        }
        LoopOutcome::Shutdown => {
            Err(format!("session stopped after {timeout:?} without completing").into())
        }
        LoopOutcome::SurfaceLost => Err("camera surface lost".into()),
    }
}

fn print_written(dir: &Path, poses: &CapturedPoseSet) {
    for (step, _) in poses.iter() {
        println!("{}", dir.join(format!("{step}.png")).display());
    }
}

fn run_validate(
    config: CaptureConfig,
    args: &ValidateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let step = parse_step(&args.step)?;
    let json = std::fs::read_to_string(&args.face)?;
    let face: DetectedFace = serde_json::from_str(&json)?;

    let roi = RoiBounds::compute(args.width, args.height, &config);
    let validator = GeometryValidator::new(config);
    let verdict = validator.evaluate(Some(&face), args.width, args.height, &roi, step);
    let status = CaptureStatus::classify(
        Some(face.confidence),
        &verdict,
        validator.config().min_confidence,
    );

    let report = serde_json::json!({
        "step": step,
        "status": status,
        "valid": verdict.is_valid(),
        "verdict": verdict,
        "roi": roi,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_step(s: &str) -> Result<PoseStep, String> {
    PoseStep::ALL
        .into_iter()
        .find(|step| step.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown pose '{s}' (expected front, left or right)"))
}
