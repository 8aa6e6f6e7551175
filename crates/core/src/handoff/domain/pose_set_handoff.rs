use thiserror::Error;

use crate::capture::domain::pose_step::CapturedPoseSet;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("failed to persist captured poses: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode captured pose: {0}")]
    Encode(String),
    #[error("captured pose set is incomplete")]
    Incomplete,
}

/// Receives the finished pose set. The capture loop has no further
/// responsibility for the frames once this returns.
pub trait PoseSetHandoff: Send {
    fn hand_off(&mut self, poses: &CapturedPoseSet) -> Result<(), HandoffError>;
}
