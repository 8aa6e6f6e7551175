use std::collections::HashMap;
use std::time::Instant;

use crate::capture::domain::capture_status_machine::CaptureStatus;
use crate::capture::domain::pose_step::PoseStep;
use crate::feedback::domain::capture_feedback::CaptureFeedback;

/// Silent feedback that discards all events.
pub struct NullCaptureFeedback;

impl CaptureFeedback for NullCaptureFeedback {
    fn status_entered(&mut self, _status: CaptureStatus, _step: PoseStep) {}
    fn pose_advanced(&mut self, _captured: PoseStep, _next: PoseStep) {}
}

/// CLI-oriented feedback that logs every entry and keeps per-status counts
/// for an end-of-session summary.
pub struct LogCaptureFeedback {
    entries: HashMap<CaptureStatus, usize>,
    advances: Vec<(PoseStep, f64)>,
    start_time: Instant,
    completed: bool,
}

impl LogCaptureFeedback {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            advances: Vec::new(),
            start_time: Instant::now(),
            completed: false,
        }
    }

    pub fn entries_for(&self, status: CaptureStatus) -> usize {
        self.entries.get(&status).copied().unwrap_or(0)
    }

    /// Returns the formatted summary, or `None` if nothing happened.
    pub fn summary_string(&self) -> Option<String> {
        if self.entries.is_empty() && self.advances.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let outcome = if self.completed {
            "complete"
        } else {
            "incomplete"
        };
        let mut lines = vec![format!(
            "Capture summary ({outcome}, {} poses, {elapsed_s:.1}s):",
            self.advances.len()
        )];

        for status in CaptureStatus::ALL {
            let count = self.entries_for(status);
            if count > 0 {
                lines.push(format!("  {status:10}: entered {count}x"));
            }
        }
        for (step, at_s) in &self.advances {
            lines.push(format!("  {step:10}: captured at {at_s:.1}s"));
        }
        Some(lines.join("\n"))
    }
}

impl Default for LogCaptureFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureFeedback for LogCaptureFeedback {
    fn status_entered(&mut self, status: CaptureStatus, step: PoseStep) {
        *self.entries.entry(status).or_default() += 1;
        log::info!("[{step}] status: {status}");
    }

    fn pose_advanced(&mut self, captured: PoseStep, next: PoseStep) {
        self.advances
            .push((captured, self.start_time.elapsed().as_secs_f64()));
        log::info!("Captured {captured} pose, next: {next}");
    }

    fn session_completed(&mut self) {
        self.completed = true;
        self.advances
            .push((PoseStep::Right, self.start_time.elapsed().as_secs_f64()));
        log::info!("All poses captured");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_feedback_all_methods_are_noop() {
        let mut feedback = NullCaptureFeedback;
        feedback.status_entered(CaptureStatus::Ready, PoseStep::Front);
        feedback.pose_advanced(PoseStep::Front, PoseStep::Left);
        feedback.session_completed();
        feedback.summary();
    }

    #[test]
    fn test_counts_entries_per_status() {
        let mut feedback = LogCaptureFeedback::new();
        feedback.status_entered(CaptureStatus::TooFar, PoseStep::Front);
        feedback.status_entered(CaptureStatus::Ready, PoseStep::Front);
        feedback.status_entered(CaptureStatus::TooFar, PoseStep::Left);

        assert_eq!(feedback.entries_for(CaptureStatus::TooFar), 2);
        assert_eq!(feedback.entries_for(CaptureStatus::Ready), 1);
        assert_eq!(feedback.entries_for(CaptureStatus::Centering), 0);
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogCaptureFeedback::new().summary_string().is_none());
    }

    #[test]
    fn test_summary_lists_statuses_and_poses() {
        let mut feedback = LogCaptureFeedback::new();
        feedback.status_entered(CaptureStatus::Centering, PoseStep::Front);
        feedback.pose_advanced(PoseStep::Front, PoseStep::Left);

        let summary = feedback.summary_string().unwrap();
        assert!(summary.contains("incomplete"));
        assert!(summary.contains("centering"));
        assert!(summary.contains("front"));
    }

    #[test]
    fn test_summary_marks_completion() {
        let mut feedback = LogCaptureFeedback::new();
        feedback.pose_advanced(PoseStep::Front, PoseStep::Left);
        feedback.pose_advanced(PoseStep::Left, PoseStep::Right);
        feedback.session_completed();

        let summary = feedback.summary_string().unwrap();
        assert!(summary.contains("(complete, 3 poses"));
    }
}
