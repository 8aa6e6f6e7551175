use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_detector::{DetectorError, FaceDetector};
use crate::shared::frame_sample::FrameSample;

/// One scripted detector response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptedDetection {
    Faces { faces: Vec<DetectedFace> },
    Error { error: String },
}

/// Replays pre-recorded detector responses by frame index.
///
/// Frames past the end of the script reuse the last entry, which models a
/// user holding still once the scenario has played out. Used by the CLI
/// to tune thresholds offline and by tests.
pub struct ScriptedFaceDetector {
    script: Vec<ScriptedDetection>,
}

impl ScriptedFaceDetector {
    pub fn new(script: Vec<ScriptedDetection>) -> Self {
        Self { script }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl FaceDetector for ScriptedFaceDetector {
    fn detect(&mut self, frame: &FrameSample) -> Result<Vec<DetectedFace>, DetectorError> {
        let entry = self
            .script
            .get(frame.index())
            .or_else(|| self.script.last());
        match entry {
            None => Ok(Vec::new()),
            Some(ScriptedDetection::Faces { faces }) => Ok(faces.clone()),
            Some(ScriptedDetection::Error { error }) => Err(DetectorError::Failed(error.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize) -> FrameSample {
        FrameSample::blank(10, 10, index)
    }

    fn face(confidence: f64) -> DetectedFace {
        DetectedFace::from_center(5.0, 5.0, 4.0, 4.0, confidence)
    }

    #[test]
    fn test_returns_scripted_faces_for_known_frame() {
        let mut detector = ScriptedFaceDetector::new(vec![
            ScriptedDetection::Faces { faces: vec![] },
            ScriptedDetection::Faces {
                faces: vec![face(0.9)],
            },
        ]);

        assert!(detector.detect(&frame(0)).unwrap().is_empty());
        assert_eq!(detector.detect(&frame(1)).unwrap(), vec![face(0.9)]);
    }

    #[test]
    fn test_frames_past_script_repeat_last_entry() {
        let mut detector = ScriptedFaceDetector::new(vec![ScriptedDetection::Faces {
            faces: vec![face(0.5)],
        }]);

        assert_eq!(detector.detect(&frame(7)).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_script_always_returns_empty() {
        let mut detector = ScriptedFaceDetector::new(Vec::new());
        assert!(detector.is_empty());
        assert!(detector.detect(&frame(0)).unwrap().is_empty());
    }

    #[test]
    fn test_error_entry_fails_detection() {
        let mut detector = ScriptedFaceDetector::new(vec![ScriptedDetection::Error {
            error: "quota exceeded".into(),
        }]);

        let err = detector.detect(&frame(0)).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_from_json_parses_both_entry_kinds() {
        let json = r#"[
            { "faces": [] },
            { "error": "network down" },
            { "faces": [{ "bounds": [{"x":0,"y":0},{"x":4,"y":0},{"x":4,"y":4},{"x":0,"y":4}],
                          "confidence": 0.8, "roll": 1, "pan": 2, "tilt": 3 }] }
        ]"#;
        let mut detector = ScriptedFaceDetector::from_json(json).unwrap();

        assert_eq!(detector.len(), 3);
        assert!(detector.detect(&frame(1)).is_err());
        let faces = detector.detect(&frame(2)).unwrap();
        assert_eq!(faces[0].pan, 2.0);
    }

    #[test]
    fn test_from_file_missing_is_error() {
        assert!(ScriptedFaceDetector::from_file(Path::new("/nonexistent/script.json")).is_err());
    }
}
