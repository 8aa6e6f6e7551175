use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::frame_sample::FrameSample;

/// Head orientations captured in order: front, then left, then right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoseStep {
    Front,
    Left,
    Right,
}

impl PoseStep {
    pub const ALL: [PoseStep; 3] = [PoseStep::Front, PoseStep::Left, PoseStep::Right];

    /// The step that follows this one, or `None` after `Right`.
    pub fn next(self) -> Option<PoseStep> {
        match self {
            PoseStep::Front => Some(PoseStep::Left),
            PoseStep::Left => Some(PoseStep::Right),
            PoseStep::Right => None,
        }
    }

    pub fn is_side(self) -> bool {
        !matches!(self, PoseStep::Front)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PoseStep::Front => "front",
            PoseStep::Left => "left",
            PoseStep::Right => "right",
        }
    }
}

impl fmt::Display for PoseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Frames captured during one session, keyed by pose.
///
/// Grows monotonically; a pose is never overwritten once stored.
#[derive(Debug, Clone, Default)]
pub struct CapturedPoseSet {
    front: Option<FrameSample>,
    left: Option<FrameSample>,
    right: Option<FrameSample>,
}

impl CapturedPoseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `frame` under `step`. Returns `false` if that pose was
    /// already captured, leaving the existing frame in place.
    pub fn insert(&mut self, step: PoseStep, frame: FrameSample) -> bool {
        let slot = self.slot_mut(step);
        if slot.is_some() {
            return false;
        }
        *slot = Some(frame);
        true
    }

    pub fn get(&self, step: PoseStep) -> Option<&FrameSample> {
        match step {
            PoseStep::Front => self.front.as_ref(),
            PoseStep::Left => self.left.as_ref(),
            PoseStep::Right => self.right.as_ref(),
        }
    }

    pub fn contains(&self, step: PoseStep) -> bool {
        self.get(step).is_some()
    }

    pub fn len(&self) -> usize {
        PoseStep::ALL.iter().filter(|s| self.contains(**s)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.len() == PoseStep::ALL.len()
    }

    /// Captured poses in protocol order.
    pub fn iter(&self) -> impl Iterator<Item = (PoseStep, &FrameSample)> {
        PoseStep::ALL
            .into_iter()
            .filter_map(move |step| self.get(step).map(|frame| (step, frame)))
    }

    fn slot_mut(&mut self, step: PoseStep) -> &mut Option<FrameSample> {
        match step {
            PoseStep::Front => &mut self.front,
            PoseStep::Left => &mut self.left,
            PoseStep::Right => &mut self.right,
        }
    }
}
