use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capture::domain::geometry_validator::Verdict;

/// Face readiness for the current pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureStatus {
    #[default]
    None,
    TooFar,
    Centering,
    Ready,
}

impl CaptureStatus {
    pub const ALL: [CaptureStatus; 4] = [
        CaptureStatus::None,
        CaptureStatus::TooFar,
        CaptureStatus::Centering,
        CaptureStatus::Ready,
    ];

    /// Maps one analysed frame to a status. First matching rule wins:
    /// low confidence, outside the ROI, wrong size, off-center, then ready
    /// only if every predicate holds.
    pub fn classify(confidence: Option<f64>, verdict: &Verdict, min_confidence: f64) -> Self {
        let confident = confidence.is_some_and(|c| c >= min_confidence);
        if !confident || !verdict.in_roi {
            CaptureStatus::None
        } else if !verdict.is_good_size {
            CaptureStatus::TooFar
        } else if !verdict.is_centered {
            CaptureStatus::Centering
        } else if verdict.is_valid() {
            CaptureStatus::Ready
        } else {
            CaptureStatus::None
        }
    }
}

impl fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaptureStatus::None => "none",
            CaptureStatus::TooFar => "tooFar",
            CaptureStatus::Centering => "centering",
            CaptureStatus::Ready => "ready",
        };
        f.pad(s)
    }
}

/// Result of feeding one frame (or a reset) to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub previous: CaptureStatus,
    pub current: CaptureStatus,
}

impl StatusTransition {
    /// True when the status changed, i.e. entry effects should fire.
    pub fn entered(&self) -> bool {
        self.previous != self.current
    }
}

/// Holds the readiness status for the current pose step.
///
/// The machine only computes states; entry effects belong to the caller,
/// which fires them when [`StatusTransition::entered`] is true.
#[derive(Debug)]
pub struct CaptureStatusMachine {
    status: CaptureStatus,
    min_confidence: f64,
    consecutive_ready: u32,
}

impl CaptureStatusMachine {
    pub fn new(min_confidence: f64) -> Self {
        Self {
            status: CaptureStatus::None,
            min_confidence,
            consecutive_ready: 0,
        }
    }

    pub fn status(&self) -> CaptureStatus {
        self.status
    }

    /// Number of back-to-back `ready` evaluations. Informational only;
    /// readiness is granted on the first fully valid frame.
    pub fn consecutive_ready(&self) -> u32 {
        self.consecutive_ready
    }

    pub fn evaluate(&mut self, confidence: Option<f64>, verdict: &Verdict) -> StatusTransition {
        let next = CaptureStatus::classify(confidence, verdict, self.min_confidence);
        if next == CaptureStatus::Ready {
            self.consecutive_ready = self.consecutive_ready.saturating_add(1);
        } else {
            self.consecutive_ready = 0;
        }
        self.transition_to(next)
    }

    /// Back to `none` for a new pose step.
    pub fn reset(&mut self) -> StatusTransition {
        self.consecutive_ready = 0;
        self.transition_to(CaptureStatus::None)
    }

    fn transition_to(&mut self, next: CaptureStatus) -> StatusTransition {
        let previous = self.status;
        self.status = next;
        StatusTransition {
            previous,
            current: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn verdict(in_roi: bool, positioned: bool, size: bool, centered: bool) -> Verdict {
        Verdict {
            in_roi,
            well_positioned: positioned,
            is_good_size: size,
            is_centered: centered,
            size_ratio: if size { 0.2 } else { 0.01 },
        }
    }

    fn machine() -> CaptureStatusMachine {
        CaptureStatusMachine::new(0.05)
    }

    #[test]
    fn test_initial_status_is_none() {
        assert_eq!(machine().status(), CaptureStatus::None);
    }

    #[rstest]
    #[case(Some(0.9), verdict(true, true, true, true), CaptureStatus::Ready)]
    #[case(Some(0.04), verdict(true, true, true, true), CaptureStatus::None)]
    #[case(None, verdict(true, true, true, true), CaptureStatus::None)]
    #[case(Some(0.9), verdict(false, true, true, true), CaptureStatus::None)]
    #[case(Some(0.9), verdict(true, true, false, true), CaptureStatus::TooFar)]
    #[case(Some(0.9), verdict(true, false, false, false), CaptureStatus::TooFar)]
    #[case(Some(0.9), verdict(true, true, true, false), CaptureStatus::Centering)]
    #[case(Some(0.9), verdict(true, false, true, false), CaptureStatus::Centering)]
    #[case(Some(0.9), verdict(true, false, true, true), CaptureStatus::None)]
    #[case(Some(0.05), verdict(true, true, true, true), CaptureStatus::Ready)]
    fn test_classification_priority(
        #[case] confidence: Option<f64>,
        #[case] verdict: Verdict,
        #[case] expected: CaptureStatus,
    ) {
        assert_eq!(CaptureStatus::classify(confidence, &verdict, 0.05), expected);
    }

    #[test]
    fn test_ready_requires_every_predicate() {
        for bits in 0u8..16 {
            let v = verdict(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let status = CaptureStatus::classify(Some(1.0), &v, 0.05);
            assert_eq!(status == CaptureStatus::Ready, bits == 15, "bits={bits:04b}");
        }
    }

    #[test]
    fn test_repeated_ready_enters_only_once() {
        let mut m = machine();
        let ready = verdict(true, true, true, true);

        let first = m.evaluate(Some(0.9), &ready);
        let second = m.evaluate(Some(0.9), &ready);

        assert!(first.entered());
        assert!(!second.entered());
        assert_eq!(second.current, CaptureStatus::Ready);
    }

    #[test]
    fn test_consecutive_ready_counts_and_resets() {
        let mut m = machine();
        let ready = verdict(true, true, true, true);
        m.evaluate(Some(0.9), &ready);
        m.evaluate(Some(0.9), &ready);
        assert_eq!(m.consecutive_ready(), 2);

        m.evaluate(Some(0.9), &verdict(false, true, true, true));
        assert_eq!(m.consecutive_ready(), 0);

        m.evaluate(Some(0.9), &ready);
        m.reset();
        assert_eq!(m.consecutive_ready(), 0);
    }

    #[test]
    fn test_reset_from_ready_is_an_entry() {
        let mut m = machine();
        m.evaluate(Some(0.9), &verdict(true, true, true, true));
        let t = m.reset();
        assert!(t.entered());
        assert_eq!(t.previous, CaptureStatus::Ready);
        assert_eq!(m.status(), CaptureStatus::None);
    }

    #[test]
    fn test_reset_from_none_is_not_an_entry() {
        let mut m = machine();
        assert!(!m.reset().entered());
    }

    #[test]
    fn test_status_display_matches_wire_names() {
        for status in CaptureStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}
