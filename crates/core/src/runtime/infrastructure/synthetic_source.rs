//! Deterministic procedural frames for demo runs and loop tests.
//!
//! No randomness: the same (scene, index) always renders the same pixels,
//! so sessions driven from this source are fully reproducible.

use crate::runtime::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Nominal timestamp spacing (~30 fps).
const FRAME_INTERVAL_MS: f64 = 1000.0 / 30.0;

/// Base color: neither skin, fabric, fire, nor smoke to any classifier.
const BACKGROUND: (u8, u8, u8) = (30, 90, 40);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    /// Flat background; nothing for any classifier to find.
    Neutral,
    /// A flickering orange band across the lower third.
    Fire,
    /// A gray haze across the upper half.
    Smoke,
}

impl std::str::FromStr for Scene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neutral" => Ok(Scene::Neutral),
            "fire" => Ok(Scene::Fire),
            "smoke" => Ok(Scene::Smoke),
            other => Err(format!("unknown scene: {other}")),
        }
    }
}

pub struct SyntheticSource {
    width: u32,
    height: u32,
    scene: Scene,
    index: usize,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, scene: Scene) -> Self {
        Self {
            width,
            height,
            scene,
            index: 0,
        }
    }

    fn render(&self, index: usize) -> Frame {
        let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let (r, g, b) = self.pixel(x, y, index);
                data.extend_from_slice(&[r, g, b]);
            }
        }
        Frame::new(
            data,
            self.width,
            self.height,
            3,
            index,
            index as f64 * FRAME_INTERVAL_MS,
        )
    }

    fn pixel(&self, x: u32, y: u32, index: usize) -> (u8, u8, u8) {
        match self.scene {
            Scene::Neutral => BACKGROUND,
            Scene::Fire => {
                if y >= self.height * 2 / 3 {
                    // Checkerboard of orange and deep red; the phase advances
                    // each frame so the band shimmers over time as well.
                    if (x + y + index as u32) % 2 == 0 {
                        (255, 150, 50)
                    } else {
                        (200, 60, 30)
                    }
                } else {
                    BACKGROUND
                }
            }
            Scene::Smoke => {
                if y < self.height / 2 {
                    // Haze brightening toward the top, well inside the
                    // smoke-color band.
                    let fade = (y * 40 / self.height.max(1)).min(30) as u8;
                    (170 - fade, 170 - fade, 170 - fade)
                } else {
                    BACKGROUND
                }
            }
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let frame = self.render(self.index);
        self.index += 1;
        Ok(Some(frame))
    }
}
