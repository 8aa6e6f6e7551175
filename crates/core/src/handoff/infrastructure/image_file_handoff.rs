use std::path::{Path, PathBuf};

use crate::capture::domain::pose_step::CapturedPoseSet;
use crate::handoff::domain::pose_set_handoff::{HandoffError, PoseSetHandoff};
use crate::shared::frame_sample::FrameSample;

/// Writes each captured pose to `<dir>/<pose>.png` using the `image` crate.
pub struct ImageFileHandoff {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl ImageFileHandoff {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written by the most recent handoff.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

fn write_png(path: &Path, frame: &FrameSample) -> Result<(), HandoffError> {
    if frame.channels() != 3 {
        return Err(HandoffError::Encode(format!(
            "expected 3 channels, got {}",
            frame.channels()
        )));
    }
    let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or_else(|| HandoffError::Encode("frame data does not match dimensions".into()))?;
    img.save(path)
        .map_err(|e| HandoffError::Encode(format!("{}: {e}", path.display())))
}

impl PoseSetHandoff for ImageFileHandoff {
    fn hand_off(&mut self, poses: &CapturedPoseSet) -> Result<(), HandoffError> {
        if !poses.is_complete() {
            return Err(HandoffError::Incomplete);
        }
        std::fs::create_dir_all(&self.dir)?;

        self.written.clear();
        for (step, frame) in poses.iter() {
            let path = self.dir.join(format!("{step}.png"));
            write_png(&path, frame)?;
            log::info!("Wrote {step} pose to {}", path.display());
            self.written.push(path);
        }
        Ok(())
    }
}
