use crate::capture::domain::capture_status_machine::CaptureStatus;
use crate::capture::domain::pose_step::PoseStep;

/// Presentation-side observer of the capture loop.
///
/// Receives each status *entry* (never repeats of the same status) and each
/// pose advance. Implementations own haptics, animations and messaging.
pub trait CaptureFeedback: Send {
    fn status_entered(&mut self, status: CaptureStatus, step: PoseStep);

    fn pose_advanced(&mut self, captured: PoseStep, next: PoseStep);

    /// The final pose was stored. Default: no-op.
    fn session_completed(&mut self) {}

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}
