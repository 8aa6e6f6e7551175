use crate::camera::domain::camera::{Camera, CameraError};
use crate::shared::frame_sample::FrameSample;

/// Produces blank frames of a fixed size with increasing indices.
///
/// Stands in for a real camera when only detections matter, e.g. when a
/// scripted detector supplies the faces.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    next_index: usize,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next_index: 0,
        }
    }
}

impl Camera for SyntheticCamera {
    fn capture_frame(&mut self) -> Result<FrameSample, CameraError> {
        if self.width == 0 || self.height == 0 {
            return Err(CameraError::Failed("zero-sized synthetic frame".into()));
        }
        let frame = FrameSample::blank(self.width, self.height, self.next_index);
        self.next_index += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_increase() {
        let mut camera = SyntheticCamera::new(8, 6);
        let a = camera.capture_frame().unwrap();
        let b = camera.capture_frame().unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!((b.width(), b.height()), (8, 6));
    }

    #[test]
    fn test_zero_size_fails() {
        let mut camera = SyntheticCamera::new(0, 10);
        assert!(camera.capture_frame().is_err());
    }
}
