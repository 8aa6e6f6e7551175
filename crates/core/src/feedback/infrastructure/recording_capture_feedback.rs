use std::sync::{Arc, Mutex};

use crate::capture::domain::capture_status_machine::CaptureStatus;
use crate::capture::domain::pose_step::PoseStep;
use crate::feedback::domain::capture_feedback::CaptureFeedback;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    StatusEntered(CaptureStatus, PoseStep),
    PoseAdvanced(PoseStep, PoseStep),
    SessionCompleted,
}

/// Records events into a shared list so they can be inspected after the
/// feedback has been moved into a session or loop thread.
#[derive(Clone, Default)]
pub struct RecordingCaptureFeedback {
    events: Arc<Mutex<Vec<FeedbackEvent>>>,
}

impl RecordingCaptureFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Statuses entered, in order.
    pub fn statuses(&self) -> Vec<CaptureStatus> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FeedbackEvent::StatusEntered(status, _) => Some(status),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: FeedbackEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl CaptureFeedback for RecordingCaptureFeedback {
    fn status_entered(&mut self, status: CaptureStatus, step: PoseStep) {
        self.push(FeedbackEvent::StatusEntered(status, step));
    }

    fn pose_advanced(&mut self, captured: PoseStep, next: PoseStep) {
        self.push(FeedbackEvent::PoseAdvanced(captured, next));
    }

    fn session_completed(&mut self) {
        self.push(FeedbackEvent::SessionCompleted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_events() {
        let recorder = RecordingCaptureFeedback::new();
        let mut boxed: Box<dyn CaptureFeedback> = Box::new(recorder.clone());

        boxed.status_entered(CaptureStatus::Ready, PoseStep::Front);
        boxed.pose_advanced(PoseStep::Front, PoseStep::Left);
        boxed.session_completed();

        assert_eq!(
            recorder.events(),
            vec![
                FeedbackEvent::StatusEntered(CaptureStatus::Ready, PoseStep::Front),
                FeedbackEvent::PoseAdvanced(PoseStep::Front, PoseStep::Left),
                FeedbackEvent::SessionCompleted,
            ]
        );
        assert_eq!(recorder.statuses(), vec![CaptureStatus::Ready]);
    }
}
