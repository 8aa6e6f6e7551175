use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::camera::domain::camera::{Camera, CameraError};
use crate::capture::domain::pose_sequencer::CaptureProgress;
use crate::capture::domain::pose_step::CapturedPoseSet;
use crate::detection::domain::face_detector::FaceDetector;
use crate::handoff::domain::pose_set_handoff::{HandoffError, PoseSetHandoff};
use crate::pipeline::capture_session::{CaptureSession, SampleOutcome};
use crate::shared::frame_sample::FrameSample;

/// At most one sample and one capture photo are ever queued.
const JOB_QUEUE_CAPACITY: usize = 2;

/// Why the loop stopped.
pub enum LoopOutcome {
    /// All three poses were captured and handed off.
    Completed(CapturedPoseSet),
    /// Torn down through the [`CaptureHandle`].
    Shutdown,
    /// The camera/detector worker went away.
    SurfaceLost,
}

impl LoopOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            LoopOutcome::Completed(_) => "completed",
            LoopOutcome::Shutdown => "shutdown",
            LoopOutcome::SurfaceLost => "surface lost",
        }
    }
}

impl std::fmt::Debug for LoopOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

enum Command {
    Capture,
    Shutdown,
}

/// UI-facing control of a running loop. Cheap to clone.
#[derive(Clone)]
pub struct CaptureHandle {
    commands: Sender<Command>,
    live: Arc<AtomicBool>,
}

/// Loop-side end of a [`CaptureHandle`].
pub struct CommandReceiver {
    commands: Receiver<Command>,
    live: Arc<AtomicBool>,
}

impl CaptureHandle {
    pub fn channel() -> (CaptureHandle, CommandReceiver) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let live = Arc::new(AtomicBool::new(true));
        (
            CaptureHandle {
                commands: tx,
                live: live.clone(),
            },
            CommandReceiver { commands: rx, live },
        )
    }

    /// The user pressed the shutter. Ignored by the loop unless the face
    /// is ready. Returns `false` once the loop has gone away.
    pub fn request_capture(&self) -> bool {
        self.commands.send(Command::Capture).is_ok()
    }

    /// Tears the loop down. Idempotent; safe while a detector call is in
    /// flight, whose result is then discarded.
    pub fn shutdown(&self) {
        self.live.store(false, Ordering::Release);
        let _ = self.commands.send(Command::Shutdown);
    }
}

enum Job {
    Sample,
    Capture,
}

enum WorkerResult {
    Sample(SampleOutcome),
    Capture(Result<FrameSample, CameraError>),
}

/// One wakeup of the loop; `None` means the channel closed.
enum Event {
    Tick(Instant),
    Worker(Option<WorkerResult>),
    Command(Option<Command>),
}

/// Periodic scheduler for one capture session.
///
/// Layout: `ticker → main [gate/session] → worker [camera + detector]`
///
/// The worker thread owns the camera and detector and runs jobs strictly in
/// order, so at most one detector call is ever in flight. Ticks that fire
/// meanwhile are dropped by the session's gate, never queued.
pub struct DetectionLoop {
    session: CaptureSession,
    camera: Box<dyn Camera>,
    detector: Box<dyn FaceDetector>,
    handoff: Box<dyn PoseSetHandoff>,
    commands: CommandReceiver,
    tick_interval: Duration,
}

impl DetectionLoop {
    pub fn new(
        session: CaptureSession,
        camera: Box<dyn Camera>,
        detector: Box<dyn FaceDetector>,
        handoff: Box<dyn PoseSetHandoff>,
        commands: CommandReceiver,
    ) -> Self {
        let tick_interval = session.config().sample_interval();
        Self {
            session,
            camera,
            detector,
            handoff,
            commands,
            tick_interval,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn spawn(self) -> JoinHandle<Result<LoopOutcome, HandoffError>> {
        thread::spawn(move || self.run())
    }

    pub fn run(self) -> Result<LoopOutcome, HandoffError> {
        let DetectionLoop {
            mut session,
            camera,
            detector,
            mut handoff,
            commands,
            tick_interval,
        } = self;

        let (job_tx, job_rx) = crossbeam_channel::bounded::<Job>(JOB_QUEUE_CAPACITY);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<WorkerResult>();
        // Detached: on teardown the worker finishes its current job, fails
        // to send the result and exits.
        let _worker = spawn_worker(camera, detector, job_rx, result_tx);
        let ticker = crossbeam_channel::tick(tick_interval);

        log::info!(
            "Detection loop started ({}ms tick)",
            tick_interval.as_millis()
        );

        let outcome = loop {
            let event = crossbeam_channel::select! {
                recv(ticker) -> tick => Event::Tick(tick.unwrap_or_else(|_| Instant::now())),
                recv(result_rx) -> result => Event::Worker(result.ok()),
                recv(commands.commands) -> command => Event::Command(command.ok()),
            };
            // Teardown may have raced the wakeup; nothing below runs once
            // the handle has shut the loop down.
            if !commands.live.load(Ordering::Acquire) {
                break LoopOutcome::Shutdown;
            }

            match event {
                Event::Tick(now) => {
                    if session.try_begin_sample(now) && job_tx.send(Job::Sample).is_err() {
                        break LoopOutcome::SurfaceLost;
                    }
                }
                Event::Worker(Some(WorkerResult::Sample(outcome))) => {
                    session.complete_sample(outcome);
                    if !session.is_live() {
                        break LoopOutcome::Shutdown;
                    }
                }
                Event::Worker(Some(WorkerResult::Capture(photo))) => {
                    match session.complete_capture(photo) {
                        Ok(Some(CaptureProgress::Complete(poses))) => {
                            if let Err(e) = handoff.hand_off(&poses) {
                                log::warn!("Handoff failed: {e}");
                                session.shutdown();
                                session.summary();
                                return Err(e);
                            }
                            break LoopOutcome::Completed(poses);
                        }
                        Ok(_) => {}
                        Err(rejected) => log::debug!("Capture dropped: {rejected}"),
                    }
                }
                Event::Worker(None) => {
                    log::warn!("Camera worker stopped unexpectedly");
                    break LoopOutcome::SurfaceLost;
                }
                Event::Command(Some(Command::Capture)) => match session.request_capture() {
                    Ok(step) => {
                        log::info!("Capturing {step} pose");
                        if job_tx.send(Job::Capture).is_err() {
                            break LoopOutcome::SurfaceLost;
                        }
                    }
                    Err(rejected) => log::debug!("Capture request ignored: {rejected}"),
                },
                Event::Command(Some(Command::Shutdown)) | Event::Command(None) => {
                    break LoopOutcome::Shutdown;
                }
            }
        };

        session.shutdown();
        session.summary();
        log::info!("Detection loop stopped: {}", outcome.label());
        Ok(outcome)
    }
}

fn spawn_worker(
    mut camera: Box<dyn Camera>,
    mut detector: Box<dyn FaceDetector>,
    job_rx: Receiver<Job>,
    result_tx: Sender<WorkerResult>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for job in job_rx {
            let result = match job {
                Job::Sample => WorkerResult::Sample(sample(&mut *camera, &mut *detector)),
                Job::Capture => WorkerResult::Capture(camera.capture_frame()),
            };
            if result_tx.send(result).is_err() {
                break;
            }
        }
    })
}

fn sample(camera: &mut dyn Camera, detector: &mut dyn FaceDetector) -> SampleOutcome {
    match camera.capture_frame() {
        Err(e) => SampleOutcome::CameraFailed(e),
        Ok(frame) if !frame.is_usable() => {
            SampleOutcome::CameraFailed(CameraError::Failed("frame has no image data".into()))
        }
        Ok(frame) => {
            let detection = detector.detect(&frame);
            SampleOutcome::Analysed { frame, detection }
        }
    }
}
