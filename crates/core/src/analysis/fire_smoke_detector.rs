//! Full-frame fire and smoke presence heuristics.

use crate::analysis::motion_pattern;
use crate::analysis::pixel_classifiers::{is_fire_color, is_smoke_color};
use crate::shared::frame::Frame;

/// A moderate fire-color ratio needs corroborating flicker; above the
/// standalone ratio, color alone decides. Static orange backgrounds sit
/// between the two, which is the point of the split.
const FIRE_RATIO_CORROBORATED: f64 = 0.002;
const FIRE_RATIO_STANDALONE: f64 = 0.005;

const SMOKE_RATIO_CORROBORATED: f64 = 0.01;
const SMOKE_RATIO_STANDALONE: f64 = 0.03;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FireSmokeReading {
    pub fire_detected: bool,
    pub smoke_detected: bool,
    pub fire_ratio: f64,
    pub smoke_ratio: f64,
}

/// Classifies every pixel and corroborates moderate color ratios with the
/// single-frame motion indicators. One motion pass per call.
pub fn analyze(frame: &Frame) -> FireSmokeReading {
    let total = frame.pixel_count();
    if total == 0 {
        return FireSmokeReading::default();
    }

    let mut fire_pixels = 0usize;
    let mut smoke_pixels = 0usize;
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let (r, g, b) = frame.rgb(x, y);
            if is_fire_color(r, g, b) {
                fire_pixels += 1;
            }
            if is_smoke_color(r, g, b) {
                smoke_pixels += 1;
            }
        }
    }

    let fire_ratio = fire_pixels as f64 / total as f64;
    let smoke_ratio = smoke_pixels as f64 / total as f64;
    let motion = motion_pattern::analyze(frame);

    FireSmokeReading {
        fire_detected: (fire_ratio > FIRE_RATIO_CORROBORATED && motion.has_flickering)
            || fire_ratio > FIRE_RATIO_STANDALONE,
        smoke_detected: (smoke_ratio > SMOKE_RATIO_CORROBORATED && motion.has_upward_movement)
            || smoke_ratio > SMOKE_RATIO_STANDALONE,
        fire_ratio,
        smoke_ratio,
    }
}
