use thiserror::Error;

use crate::detection::domain::detected_face::DetectedFace;
use crate::shared::frame_sample::FrameSample;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("face detection timed out")]
    Timeout,
    #[error("face detector unavailable: {0}")]
    Unavailable(String),
    #[error("face detection failed: {0}")]
    Failed(String),
}

/// Domain interface for the external face detector.
///
/// Calls may be slow and rate-limited; the capture loop never issues a
/// second call while one is in flight. An empty result means no face.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &FrameSample) -> Result<Vec<DetectedFace>, DetectorError>;
}
