use thiserror::Error;

use crate::shared::frame_sample::FrameSample;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CameraError {
    #[error("camera is busy")]
    Busy,
    #[error("camera surface is unmounted")]
    Unmounted,
    #[error("frame capture failed: {0}")]
    Failed(String),
}

impl CameraError {
    /// Busy/unmounted errors are expected around surface transitions and
    /// are swallowed by the capture loop.
    pub fn is_transient(&self) -> bool {
        matches!(self, CameraError::Busy | CameraError::Unmounted)
    }
}

/// Domain interface for the camera surface.
pub trait Camera: Send {
    fn capture_frame(&mut self) -> Result<FrameSample, CameraError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CameraError::Busy, true)]
    #[case(CameraError::Unmounted, true)]
    #[case(CameraError::Failed("sensor".into()), false)]
    fn test_is_transient(#[case] err: CameraError, #[case] expected: bool) {
        assert_eq!(err.is_transient(), expected);
    }
}
