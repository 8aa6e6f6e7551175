use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::camera::domain::camera::{Camera, CameraError};
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame_sample::FrameSample;

/// Replays a directory of still images as camera frames, in file-name order.
///
/// Once the sequence is exhausted the last image keeps being returned, the
/// way a live preview keeps showing a subject who holds still.
pub struct ImageSequenceCamera {
    paths: Vec<PathBuf>,
    next_index: usize,
}

impl ImageSequenceCamera {
    pub fn open(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_image(p))
            .collect();
        if paths.is_empty() {
            return Err(format!("no images found in {}", dir.display()).into());
        }
        paths.sort();
        Ok(Self {
            paths,
            next_index: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn decode(path: &Path, index: usize) -> Result<FrameSample, CameraError> {
    let img = image::open(path)
        .map_err(|e| CameraError::Failed(format!("{}: {e}", path.display())))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok(FrameSample::new(
        img.into_raw(),
        width,
        height,
        3,
        index,
        Instant::now(),
    ))
}

impl Camera for ImageSequenceCamera {
    fn capture_frame(&mut self) -> Result<FrameSample, CameraError> {
        let last = self.paths.len().checked_sub(1).ok_or(CameraError::Unmounted)?;
        let path = &self.paths[self.next_index.min(last)];
        let frame = decode(path, self.next_index)?;
        self.next_index += 1;
        Ok(frame)
    }
}
