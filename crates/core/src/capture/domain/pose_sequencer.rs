use thiserror::Error;

use crate::capture::domain::capture_status_machine::{
    CaptureStatus, CaptureStatusMachine, StatusTransition,
};
use crate::capture::domain::pose_step::{CapturedPoseSet, PoseStep};
use crate::shared::frame_sample::FrameSample;

/// Why a capture request or completion was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRejected {
    #[error("face is not ready (status: {0})")]
    NotReady(CaptureStatus),
    #[error("a capture is already being finalized")]
    Finalizing,
    #[error("no capture is in progress")]
    NotFinalizing,
    #[error("{0} pose was already captured")]
    AlreadyCaptured(PoseStep),
    #[error("all poses have been captured")]
    Complete,
    #[error("capture surface has been torn down")]
    NotLive,
}

#[derive(Debug)]
pub enum CaptureProgress {
    /// `captured` was stored; the session now waits for `next`.
    Advanced {
        captured: PoseStep,
        next: PoseStep,
        reset: StatusTransition,
    },
    /// The last pose was stored; the full set is handed back.
    Complete(CapturedPoseSet),
}

/// Drives the front → left → right capture protocol.
///
/// Capturing is two-phase: [`request_capture`](Self::request_capture)
/// claims the current step, then [`complete_capture`](Self::complete_capture)
/// stores the frame and advances. Between the two, further requests are
/// rejected so a double trigger cannot store two frames.
#[derive(Debug)]
pub struct PoseSequencer {
    step: PoseStep,
    finalizing: bool,
    complete: bool,
    captured: CapturedPoseSet,
}

impl Default for PoseSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseSequencer {
    pub fn new() -> Self {
        Self {
            step: PoseStep::Front,
            finalizing: false,
            complete: false,
            captured: CapturedPoseSet::new(),
        }
    }

    pub fn step(&self) -> PoseStep {
        self.step
    }

    pub fn is_finalizing(&self) -> bool {
        self.finalizing
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn captured(&self) -> &CapturedPoseSet {
        &self.captured
    }

    pub fn request_capture(&mut self, status: CaptureStatus) -> Result<PoseStep, CaptureRejected> {
        if self.complete {
            return Err(CaptureRejected::Complete);
        }
        if self.finalizing {
            return Err(CaptureRejected::Finalizing);
        }
        if status != CaptureStatus::Ready {
            return Err(CaptureRejected::NotReady(status));
        }
        self.finalizing = true;
        Ok(self.step)
    }

    /// Stores `frame` for the claimed step and advances, resetting the
    /// status machine so the next pose starts from `none`.
    pub fn complete_capture(
        &mut self,
        frame: FrameSample,
        machine: &mut CaptureStatusMachine,
    ) -> Result<CaptureProgress, CaptureRejected> {
        if !self.finalizing {
            return Err(CaptureRejected::NotFinalizing);
        }
        self.finalizing = false;

        let captured = self.step;
        if !self.captured.insert(captured, frame) {
            return Err(CaptureRejected::AlreadyCaptured(captured));
        }
        let reset = machine.reset();

        match captured.next() {
            Some(next) => {
                self.step = next;
                Ok(CaptureProgress::Advanced {
                    captured,
                    next,
                    reset,
                })
            }
            None => {
                self.complete = true;
                Ok(CaptureProgress::Complete(std::mem::take(&mut self.captured)))
            }
        }
    }

    /// Releases a claimed step without storing anything, e.g. when the
    /// photo could not be taken. The step does not change.
    pub fn abort_capture(&mut self) {
        self.finalizing = false;
    }

    /// Starts over from `front` with nothing captured.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
