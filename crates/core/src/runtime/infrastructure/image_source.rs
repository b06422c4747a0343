use std::path::Path;

use crate::runtime::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Nominal timestamp spacing (~30 fps).
const FRAME_INTERVAL_MS: f64 = 1000.0 / 30.0;

/// Replays a still image as an endless frame stream.
///
/// Decodes once at open; each `next_frame` clones the pixels into a fresh
/// `Frame` with an advancing index and timestamp, matching the per-iteration
/// ownership the loop expects.
pub struct ImageSource {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl ImageSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let image = image::open(path)?.to_rgb8();
        let (width, height) = image.dimensions();
        Ok(Self {
            data: image.into_raw(),
            width,
            height,
            index: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl FrameSource for ImageSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let frame = Frame::new(
            self.data.clone(),
            self.width,
            self.height,
            3,
            self.index,
            self.index as f64 * FRAME_INTERVAL_MS,
        );
        self.index += 1;
        Ok(Some(frame))
    }
}
