//! Default tuning values for the capture loop.
//!
//! These encode deliberate UX tuning. The front/side asymmetry in the
//! centering and angle limits is intentional: side poses sit off-center
//! and carry large pan angles because the head is turned.

/// Guide region width as a fraction of the frame width.
pub const ROI_WIDTH_RATIO: f64 = 0.62;
/// Guide region height as a multiple of the guide region width.
pub const ROI_HEIGHT_RATIO: f64 = 1.35;
/// Margin added to each side of the ROI when testing the face center.
pub const ROI_TOLERANCE: f64 = 0.15;

pub const MIN_SIZE_RATIO: f64 = 0.05;
pub const MAX_SIZE_RATIO: f64 = 0.85;

/// Detections below this confidence are treated as "no face".
pub const MIN_CONFIDENCE: f64 = 0.05;

pub const FRONT_MAX_OFFSET_X: f64 = 0.35;
pub const SIDE_MAX_OFFSET_X: f64 = 0.45;
pub const MAX_OFFSET_Y: f64 = 0.35;

pub const FRONT_MAX_ANGLE_DEG: f64 = 75.0;
pub const SIDE_MAX_ANGLE_DEG: f64 = 85.0;

/// Minimum spacing between two detector calls.
pub const SAMPLE_INTERVAL_MS: u64 = 800;
/// Grace period before the first sample so the camera surface can settle.
pub const STARTUP_DELAY_MS: u64 = 800;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const CONFIG_DIR_NAME: &str = "PoseCapture";
pub const CONFIG_FILE_NAME: &str = "capture.json";
