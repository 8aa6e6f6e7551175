use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// One face as reported by the external detector.
///
/// Angles are in degrees. The polygon normally holds the four corners of
/// the face box; anything shorter is treated as "no face".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub bounds: Vec<Point>,
    pub confidence: f64,
    #[serde(default)]
    pub roll: f64,
    #[serde(default)]
    pub pan: f64,
    #[serde(default)]
    pub tilt: f64,
}

impl DetectedFace {
    /// Builds a face from an axis-aligned box given as center and size.
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64, confidence: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self {
            bounds: vec![
                Point::new(cx - hw, cy - hh),
                Point::new(cx + hw, cy - hh),
                Point::new(cx + hw, cy + hh),
                Point::new(cx - hw, cy + hh),
            ],
            confidence,
            roll: 0.0,
            pan: 0.0,
            tilt: 0.0,
        }
    }

    pub fn with_angles(mut self, roll: f64, pan: f64, tilt: f64) -> Self {
        self.roll = roll;
        self.pan = pan;
        self.tilt = tilt;
        self
    }

    /// Bounding box of the polygon, or `None` when the polygon is malformed
    /// (fewer than four vertices or non-finite coordinates).
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.bounds.len() < 4 {
            return None;
        }
        if self.bounds.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        let mut bbox = BoundingBox {
            left: f64::INFINITY,
            top: f64::INFINITY,
            right: f64::NEG_INFINITY,
            bottom: f64::NEG_INFINITY,
        };
        for p in &self.bounds {
            bbox.left = bbox.left.min(p.x);
            bbox.top = bbox.top.min(p.y);
            bbox.right = bbox.right.max(p.x);
            bbox.bottom = bbox.bottom.max(p.y);
        }
        Some(bbox)
    }

    /// Picks the face the capture loop evaluates when several are found.
    pub fn most_confident(faces: &[DetectedFace]) -> Option<&DetectedFace> {
        faces
            .iter()
            .filter(|f| f.confidence.is_finite())
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounding_box_of_rotated_polygon() {
        let face = DetectedFace {
            bounds: vec![
                Point::new(50.0, 10.0),
                Point::new(90.0, 50.0),
                Point::new(50.0, 90.0),
                Point::new(10.0, 50.0),
            ],
            confidence: 0.9,
            roll: 0.0,
            pan: 0.0,
            tilt: 0.0,
        };
        let bbox = face.bounding_box().unwrap();
        assert_relative_eq!(bbox.left, 10.0);
        assert_relative_eq!(bbox.right, 90.0);
        assert_relative_eq!(bbox.top, 10.0);
        assert_relative_eq!(bbox.bottom, 90.0);
        assert_eq!(bbox.center(), (50.0, 50.0));
        assert_relative_eq!(bbox.area(), 6400.0);
    }

    #[test]
    fn test_from_center_produces_four_corners() {
        let face = DetectedFace::from_center(100.0, 200.0, 40.0, 60.0, 0.8);
        assert_eq!(face.bounds.len(), 4);
        let bbox = face.bounding_box().unwrap();
        assert_relative_eq!(bbox.width(), 40.0);
        assert_relative_eq!(bbox.height(), 60.0);
        assert_eq!(bbox.center(), (100.0, 200.0));
    }

    #[test]
    fn test_too_few_vertices_has_no_box() {
        let mut face = DetectedFace::from_center(100.0, 100.0, 10.0, 10.0, 0.9);
        face.bounds.truncate(3);
        assert!(face.bounding_box().is_none());
    }

    #[test]
    fn test_non_finite_vertex_has_no_box() {
        let mut face = DetectedFace::from_center(100.0, 100.0, 10.0, 10.0, 0.9);
        face.bounds[2].x = f64::NAN;
        assert!(face.bounding_box().is_none());
    }

    #[test]
    fn test_most_confident_picks_highest() {
        let faces = vec![
            DetectedFace::from_center(0.0, 0.0, 1.0, 1.0, 0.4),
            DetectedFace::from_center(5.0, 5.0, 1.0, 1.0, 0.9),
            DetectedFace::from_center(9.0, 9.0, 1.0, 1.0, 0.6),
        ];
        let best = DetectedFace::most_confident(&faces).unwrap();
        assert_relative_eq!(best.confidence, 0.9);
    }

    #[test]
    fn test_most_confident_of_empty_is_none() {
        assert!(DetectedFace::most_confident(&[]).is_none());
    }

    #[test]
    fn test_deserialize_defaults_angles() {
        let face: DetectedFace = serde_json::from_str(
            r#"{ "bounds": [{"x":0,"y":0},{"x":1,"y":0},{"x":1,"y":1},{"x":0,"y":1}], "confidence": 0.7 }"#,
        )
        .unwrap();
        assert_relative_eq!(face.roll, 0.0);
        assert_relative_eq!(face.confidence, 0.7);
    }
}
