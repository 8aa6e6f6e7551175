use serde::Serialize;

use crate::shared::capture_config::CaptureConfig;

/// The on-screen guide region, in frame pixel coordinates.
///
/// Derived per frame from the frame dimensions; the region is centered in
/// the frame and may extend past its edges on landscape frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoiBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl RoiBounds {
    pub fn compute(frame_width: u32, frame_height: u32, config: &CaptureConfig) -> Self {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        let width = fw * config.roi_width_ratio;
        let height = width * config.roi_height_ratio;
        let left = (fw - width) / 2.0;
        let top = (fh - height) / 2.0;
        Self {
            left,
            right: left + width,
            top,
            bottom: top + height,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Grows every side by `tolerance` times the region's own extent on
    /// that axis.
    pub fn expanded(&self, tolerance: f64) -> Self {
        let dx = self.width * tolerance;
        let dy = self.height * tolerance;
        Self {
            left: self.left - dx,
            right: self.right + dx,
            top: self.top - dy,
            bottom: self.bottom + dy,
            width: self.width + 2.0 * dx,
            height: self.height + 2.0 * dy,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}
