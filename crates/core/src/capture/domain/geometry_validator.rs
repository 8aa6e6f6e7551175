//! Geometric acceptance checks for a detected face against the guide region.
//!
//! Everything here is pure: no clock, no camera, no state. The capture
//! status machine consumes the resulting [`Verdict`].

use serde::Serialize;

use crate::capture::domain::pose_step::PoseStep;
use crate::capture::domain::roi_bounds::RoiBounds;
use crate::detection::domain::detected_face::DetectedFace;
use crate::shared::capture_config::{CaptureConfig, ThresholdProfile};

/// Outcome of validating one face against one ROI for one pose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Verdict {
    pub in_roi: bool,
    pub well_positioned: bool,
    pub is_good_size: bool,
    pub is_centered: bool,
    /// Face box area over frame area.
    pub size_ratio: f64,
}

impl Verdict {
    /// All four predicates hold; the face may be captured.
    pub fn is_valid(&self) -> bool {
        self.in_roi && self.well_positioned && self.is_good_size && self.is_centered
    }
}

pub struct GeometryValidator {
    config: CaptureConfig,
}

impl GeometryValidator {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        face: Option<&DetectedFace>,
        frame_width: u32,
        frame_height: u32,
        roi: &RoiBounds,
        step: PoseStep,
    ) -> Verdict {
        let Some(bbox) = face.and_then(DetectedFace::bounding_box) else {
            return Verdict::default();
        };
        let frame_area = frame_width as f64 * frame_height as f64;
        if frame_area <= 0.0 {
            return Verdict::default();
        }

        let profile = self.config.profile_for(step);
        let (cx, cy) = bbox.center();
        let (roi_cx, roi_cy) = roi.center();
        let size_ratio = bbox.area() / frame_area;

        Verdict {
            in_roi: in_roi(cx, cy, roi, self.config.roi_tolerance),
            well_positioned: face.is_some_and(|f| is_well_positioned(f, profile)),
            is_good_size: is_good_size(size_ratio, &self.config),
            is_centered: is_centered(cx - roi_cx, cy - roi_cy, roi, profile),
            size_ratio,
        }
    }
}

/// Face center lies inside the ROI grown by `tolerance` on every side.
pub fn in_roi(cx: f64, cy: f64, roi: &RoiBounds, tolerance: f64) -> bool {
    roi.expanded(tolerance).contains(cx, cy)
}

/// Inclusive on both ends of the configured size range.
pub fn is_good_size(size_ratio: f64, config: &CaptureConfig) -> bool {
    size_ratio >= config.min_size_ratio && size_ratio <= config.max_size_ratio
}

/// Offset from the ROI center is strictly below the pose's limits.
pub fn is_centered(dx: f64, dy: f64, roi: &RoiBounds, profile: &ThresholdProfile) -> bool {
    dx.abs() < roi.width * profile.max_offset_x && dy.abs() < roi.height * profile.max_offset_y
}

/// Roll, pan and tilt are all within the pose's angle limit.
pub fn is_well_positioned(face: &DetectedFace, profile: &ThresholdProfile) -> bool {
    [face.roll, face.pan, face.tilt]
        .iter()
        .all(|a| a.abs() <= profile.max_angle_deg)
}
