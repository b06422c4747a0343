//! Single-frame motion-pattern statistics.
//!
//! No temporal history is kept: flicker and upward movement are approximated
//! from one frame's local intensity gradients. This is a deliberate
//! simplification inherited from the tuned system — switching to true
//! inter-frame differencing would change every downstream threshold.

use crate::shared::frame::Frame;

/// A pixel "flickers" when it differs from its 4-neighborhood mean by more
/// than this intensity delta.
const FLICKER_INTENSITY_DELTA: f64 = 40.0;

/// A pixel contributes an upward gradient when it is brighter than the pixel
/// below it by more than this delta.
const UPWARD_GRADIENT_DELTA: f64 = 20.0;

const FLICKER_RATIO_THRESHOLD: f64 = 0.01;
const UPWARD_RATIO_THRESHOLD: f64 = 0.008;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionIndicators {
    pub flickering_ratio: f64,
    pub upward_motion_ratio: f64,
    pub has_flickering: bool,
    pub has_upward_movement: bool,
}

/// Scans all interior pixels (1-pixel border excluded). O(width * height);
/// callers throttle rather than running this every render tick.
pub fn analyze(frame: &Frame) -> MotionIndicators {
    let width = frame.width();
    let height = frame.height();
    if width < 3 || height < 3 {
        return MotionIndicators::default();
    }

    let mut intensity_changes = 0usize;
    let mut vertical_gradients = 0usize;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let current = intensity(frame.rgb(x, y));
            let above = intensity(frame.rgb(x, y - 1));
            let below = intensity(frame.rgb(x, y + 1));
            let left = intensity(frame.rgb(x - 1, y));
            let right = intensity(frame.rgb(x + 1, y));

            let neighbor_avg = (above + below + left + right) / 4.0;
            if (current - neighbor_avg).abs() > FLICKER_INTENSITY_DELTA {
                intensity_changes += 1;
            }
            if current - below > UPWARD_GRADIENT_DELTA {
                vertical_gradients += 1;
            }
        }
    }

    let total = ((width - 2) as usize * (height - 2) as usize) as f64;
    let flickering_ratio = intensity_changes as f64 / total;
    let upward_motion_ratio = vertical_gradients as f64 / total;

    MotionIndicators {
        flickering_ratio,
        upward_motion_ratio,
        has_flickering: flickering_ratio > FLICKER_RATIO_THRESHOLD,
        has_upward_movement: upward_motion_ratio > UPWARD_RATIO_THRESHOLD,
    }
}

fn intensity((r, g, b): (u8, u8, u8)) -> f64 {
    (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0
}
