use std::time::Instant;

use crate::camera::domain::camera::CameraError;
use crate::capture::domain::capture_status_machine::{
    CaptureStatus, CaptureStatusMachine, StatusTransition,
};
use crate::capture::domain::detection_gate::DetectionGate;
use crate::capture::domain::geometry_validator::{GeometryValidator, Verdict};
use crate::capture::domain::pose_sequencer::{CaptureProgress, CaptureRejected, PoseSequencer};
use crate::capture::domain::pose_step::{CapturedPoseSet, PoseStep};
use crate::capture::domain::roi_bounds::RoiBounds;
use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_detector::DetectorError;
use crate::feedback::domain::capture_feedback::CaptureFeedback;
use crate::shared::capture_config::CaptureConfig;
use crate::shared::frame_sample::FrameSample;

/// What came back from one admitted sample.
#[derive(Debug)]
pub enum SampleOutcome {
    CameraFailed(CameraError),
    Analysed {
        frame: FrameSample,
        detection: Result<Vec<DetectedFace>, DetectorError>,
    },
}

/// What the session did with a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleDisposition {
    Evaluated {
        transition: StatusTransition,
        verdict: Verdict,
    },
    /// Detector failed; the status was left unchanged.
    Held,
    /// No usable frame; nothing was evaluated.
    Skipped,
    /// The session was torn down while the sample was in flight.
    Discarded,
}

/// State owned by one capture screen session.
///
/// Single-owner and clock-free: callers pass `now` to admission and feed
/// back sample results, so the session can be driven deterministically in
/// tests or by [`DetectionLoop`](crate::pipeline::detection_loop::DetectionLoop).
/// Every completion path checks liveness before touching state.
pub struct CaptureSession {
    validator: GeometryValidator,
    gate: DetectionGate,
    machine: CaptureStatusMachine,
    sequencer: PoseSequencer,
    feedback: Box<dyn CaptureFeedback>,
}

impl CaptureSession {
    pub fn new(
        config: CaptureConfig,
        feedback: Box<dyn CaptureFeedback>,
        started_at: Instant,
    ) -> Self {
        let gate = DetectionGate::new(config.sample_interval(), config.startup_delay(), started_at);
        let machine = CaptureStatusMachine::new(config.min_confidence);
        Self {
            validator: GeometryValidator::new(config),
            gate,
            machine,
            sequencer: PoseSequencer::new(),
            feedback,
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        self.validator.config()
    }

    pub fn status(&self) -> CaptureStatus {
        self.machine.status()
    }

    pub fn pose_step(&self) -> PoseStep {
        self.sequencer.step()
    }

    pub fn is_live(&self) -> bool {
        self.gate.is_live()
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    pub fn consecutive_ready(&self) -> u32 {
        self.machine.consecutive_ready()
    }

    pub fn captured(&self) -> &CapturedPoseSet {
        self.sequencer.captured()
    }

    /// Asks the gate for a detector slot. Sampling pauses while a pose is
    /// being finalized and after the session completes.
    pub fn try_begin_sample(&mut self, now: Instant) -> bool {
        if self.sequencer.is_finalizing() || self.sequencer.is_complete() {
            return false;
        }
        self.gate.try_admit(now)
    }

    pub fn complete_sample(&mut self, outcome: SampleOutcome) -> SampleDisposition {
        if !self.gate.is_live() {
            log::debug!("Discarding sample that finished after teardown");
            return SampleDisposition::Discarded;
        }
        self.gate.release();

        match outcome {
            SampleOutcome::CameraFailed(e) => {
                if e.is_transient() {
                    log::debug!("Skipping sample: {e}");
                } else {
                    log::warn!("Skipping sample: {e}");
                }
                SampleDisposition::Skipped
            }
            SampleOutcome::Analysed {
                detection: Err(e),
                ..
            } => {
                log::warn!("{e}; holding status {}", self.machine.status());
                SampleDisposition::Held
            }
            SampleOutcome::Analysed {
                frame,
                detection: Ok(faces),
            } => self.evaluate(&frame, &faces),
        }
    }

    fn evaluate(&mut self, frame: &FrameSample, faces: &[DetectedFace]) -> SampleDisposition {
        let step = self.sequencer.step();
        let face = DetectedFace::most_confident(faces);
        let roi = RoiBounds::compute(frame.width(), frame.height(), self.validator.config());
        let verdict = self
            .validator
            .evaluate(face, frame.width(), frame.height(), &roi, step);
        let transition = self.machine.evaluate(face.map(|f| f.confidence), &verdict);
        log::debug!(
            "[{step}] frame {} analysed {}ms after capture: {}",
            frame.index(),
            frame.captured_at().elapsed().as_millis(),
            transition.current
        );

        if transition.entered() {
            self.feedback.status_entered(transition.current, step);
        }
        SampleDisposition::Evaluated {
            transition,
            verdict,
        }
    }

    /// Claims the current pose for capture. Only accepted while `ready`.
    pub fn request_capture(&mut self) -> Result<PoseStep, CaptureRejected> {
        if !self.gate.is_live() {
            return Err(CaptureRejected::NotLive);
        }
        self.sequencer.request_capture(self.machine.status())
    }

    /// Finishes a claimed capture with the photo taken for it.
    ///
    /// Returns `Ok(None)` when the photo failed; the pose stays claimable.
    pub fn complete_capture(
        &mut self,
        photo: Result<FrameSample, CameraError>,
    ) -> Result<Option<CaptureProgress>, CaptureRejected> {
        if !self.gate.is_live() {
            return Err(CaptureRejected::NotLive);
        }
        let frame = match photo {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Capture of {} pose failed: {e}", self.sequencer.step());
                self.sequencer.abort_capture();
                return Ok(None);
            }
        };

        let progress = self.sequencer.complete_capture(frame, &mut self.machine)?;
        match &progress {
            CaptureProgress::Advanced {
                captured,
                next,
                reset,
            } => {
                log::info!("Captured {captured} pose");
                self.feedback.pose_advanced(*captured, *next);
                if reset.entered() {
                    self.feedback.status_entered(reset.current, *next);
                }
            }
            CaptureProgress::Complete(_) => {
                log::info!("Captured all poses");
                self.feedback.session_completed();
            }
        }
        Ok(Some(progress))
    }

    /// Drops everything captured so far and starts again from `front`.
    pub fn reset(&mut self) {
        self.sequencer.reset();
        let transition = self.machine.reset();
        if transition.entered() {
            self.feedback.status_entered(transition.current, PoseStep::Front);
        }
    }

    /// Idempotent. Results of in-flight work are discarded on return.
    pub fn shutdown(&mut self) {
        self.gate.shutdown();
    }

    pub fn summary(&self) {
        self.feedback.summary();
    }
}
