use std::time::Instant;

/// A single camera frame: contiguous RGB bytes in row-major order.
///
/// Owned by the detection loop for the duration of one sample and dropped
/// after analysis unless it becomes a captured pose.
#[derive(Clone, Debug)]
pub struct FrameSample {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
    captured_at: Instant,
}

impl FrameSample {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        index: usize,
        captured_at: Instant,
    ) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
            captured_at,
        }
    }

    /// A black RGB frame, used where only the dimensions matter.
    pub fn blank(width: u32, height: u32, index: usize) -> Self {
        let len = (width as usize) * (height as usize) * 3;
        Self::new(vec![0u8; len], width, height, 3, index, Instant::now())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Position of this frame in the camera's capture order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    /// True when the frame carries pixels the detector can work with.
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0 && !self.data.is_empty()
    }
}
