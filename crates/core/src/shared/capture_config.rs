use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::domain::pose_step::PoseStep;
use crate::shared::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, FRONT_MAX_ANGLE_DEG, FRONT_MAX_OFFSET_X, MAX_OFFSET_Y,
    MAX_SIZE_RATIO, MIN_CONFIDENCE, MIN_SIZE_RATIO, ROI_HEIGHT_RATIO, ROI_TOLERANCE,
    ROI_WIDTH_RATIO, SAMPLE_INTERVAL_MS, SIDE_MAX_ANGLE_DEG, SIDE_MAX_OFFSET_X, STARTUP_DELAY_MS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Per-pose acceptance limits.
///
/// Offsets are fractions of the ROI width (x) and height (y); the angle
/// limit applies to roll, pan and tilt alike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    pub max_offset_x: f64,
    pub max_offset_y: f64,
    pub max_angle_deg: f64,
}

impl ThresholdProfile {
    pub fn front() -> Self {
        Self {
            max_offset_x: FRONT_MAX_OFFSET_X,
            max_offset_y: MAX_OFFSET_Y,
            max_angle_deg: FRONT_MAX_ANGLE_DEG,
        }
    }

    pub fn side() -> Self {
        Self {
            max_offset_x: SIDE_MAX_OFFSET_X,
            max_offset_y: MAX_OFFSET_Y,
            max_angle_deg: SIDE_MAX_ANGLE_DEG,
        }
    }
}

/// Every tunable of the capture loop, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub roi_width_ratio: f64,
    pub roi_height_ratio: f64,
    pub roi_tolerance: f64,
    pub min_size_ratio: f64,
    pub max_size_ratio: f64,
    pub min_confidence: f64,
    pub front: ThresholdProfile,
    pub side: ThresholdProfile,
    pub sample_interval_ms: u64,
    pub startup_delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            roi_width_ratio: ROI_WIDTH_RATIO,
            roi_height_ratio: ROI_HEIGHT_RATIO,
            roi_tolerance: ROI_TOLERANCE,
            min_size_ratio: MIN_SIZE_RATIO,
            max_size_ratio: MAX_SIZE_RATIO,
            min_confidence: MIN_CONFIDENCE,
            front: ThresholdProfile::front(),
            side: ThresholdProfile::side(),
            sample_interval_ms: SAMPLE_INTERVAL_MS,
            startup_delay_ms: STARTUP_DELAY_MS,
        }
    }
}

impl CaptureConfig {
    pub fn profile_for(&self, step: PoseStep) -> &ThresholdProfile {
        if step.is_side() {
            &self.side
        } else {
            &self.front
        }
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("roi_width_ratio", self.roi_width_ratio),
            ("roi_height_ratio", self.roi_height_ratio),
            ("front.max_offset_x", self.front.max_offset_x),
            ("front.max_offset_y", self.front.max_offset_y),
            ("front.max_angle_deg", self.front.max_angle_deg),
            ("side.max_offset_x", self.side.max_offset_x),
            ("side.max_offset_y", self.side.max_offset_y),
            ("side.max_angle_deg", self.side.max_angle_deg),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        if !(self.roi_tolerance.is_finite() && self.roi_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "roi_tolerance must be >= 0, got {}",
                self.roi_tolerance
            )));
        }
        if !(self.min_size_ratio >= 0.0 && self.min_size_ratio <= self.max_size_ratio) {
            return Err(ConfigError::Invalid(format!(
                "size range [{}, {}] is empty",
                self.min_size_ratio, self.max_size_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::Invalid(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::Invalid("sample_interval_ms must be > 0".into()));
        }
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the user config if one exists, otherwise the defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults_match_tuned_values() {
        let config = CaptureConfig::default();
        assert_relative_eq!(config.roi_width_ratio, 0.62);
        assert_relative_eq!(config.roi_height_ratio, 1.35);
        assert_relative_eq!(config.roi_tolerance, 0.15);
        assert_relative_eq!(config.min_size_ratio, 0.05);
        assert_relative_eq!(config.max_size_ratio, 0.85);
        assert_relative_eq!(config.min_confidence, 0.05);
        assert_eq!(config.sample_interval_ms, 800);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(PoseStep::Front, 0.35, 75.0)]
    #[case(PoseStep::Left, 0.45, 85.0)]
    #[case(PoseStep::Right, 0.45, 85.0)]
    fn test_profile_for_pose(#[case] step: PoseStep, #[case] offset_x: f64, #[case] angle: f64) {
        let config = CaptureConfig::default();
        let profile = config.profile_for(step);
        assert_relative_eq!(profile.max_offset_x, offset_x);
        assert_relative_eq!(profile.max_offset_y, 0.35);
        assert_relative_eq!(profile.max_angle_deg, angle);
    }

    #[test]
    fn test_validate_rejects_inverted_size_range() {
        let config = CaptureConfig {
            min_size_ratio: 0.9,
            max_size_ratio: 0.1,
            ..CaptureConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = CaptureConfig {
            sample_interval_ms: 0,
            ..CaptureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    fn test_validate_rejects_confidence_out_of_range(#[case] confidence: f64) {
        let config = CaptureConfig {
            min_confidence: confidence,
            ..CaptureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_side_offset() {
        let mut config = CaptureConfig::default();
        config.side.max_offset_x = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: CaptureConfig =
            serde_json::from_str(r#"{ "sample_interval_ms": 500 }"#).unwrap();
        assert_eq!(config.sample_interval_ms, 500);
        assert_relative_eq!(config.max_size_ratio, 0.85);
        assert_eq!(config.side, ThresholdProfile::side());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("capture.json");
        let config = CaptureConfig {
            startup_delay_ms: 400,
            ..CaptureConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = CaptureConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = CaptureConfig::load(Path::new("/nonexistent/capture.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_values_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        fs::write(&path, r#"{ "roi_width_ratio": -1.0 }"#).unwrap();
        assert!(matches!(
            CaptureConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
