//! Facial-covering heuristic over the lower half of a detected face box.

use crate::analysis::pixel_classifiers::{is_fabric_like, is_skin_tone};
use crate::analysis::region_sampler;
use crate::shared::detection::FaceDetection;
use crate::shared::frame::Frame;

/// Fabric coverage required to call the region masked.
const FABRIC_RATIO_THRESHOLD: f64 = 0.3;

/// Maximum exposed-skin coverage still consistent with a mask.
const SKIN_RATIO_CEILING: f64 = 0.4;

const CONFIDENCE_FLOOR: f64 = 0.1;
const CONFIDENCE_CEILING: f64 = 0.95;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaskReading {
    pub has_mask: bool,
    /// In [0.1, 0.95] for a decided reading, 0.0 when undecidable.
    pub confidence: f64,
}

/// Samples the nose/mouth region (lower half of the face box) and decides
/// mask presence from fabric vs. exposed-skin coverage.
///
/// Landmarks are not required: the face box corners alone determine the
/// sampled region, so their presence does not change the result. An empty
/// sample (degenerate box, face outside the frame) yields the fail-soft
/// `(false, 0.0)` — this decision never surfaces an error.
pub fn analyze(frame: &Frame, face: &FaceDetection) -> MaskReading {
    let (x1, y1) = face.top_left;
    let (x2, y2) = face.bottom_right;
    let mid_y = y1 + face.height() * 0.5;

    let pixels = region_sampler::sample(frame, x1 as i32, mid_y as i32, x2 as i32, y2 as i32);
    if pixels.is_empty() {
        return MaskReading::default();
    }

    let mut skin = 0usize;
    let mut fabric = 0usize;
    for &(r, g, b) in &pixels {
        if is_skin_tone(r, g, b) {
            skin += 1;
        }
        if is_fabric_like(r, g, b) {
            fabric += 1;
        }
    }

    let total = pixels.len() as f64;
    let skin_ratio = skin as f64 / total;
    let fabric_ratio = fabric as f64 / total;

    MaskReading {
        has_mask: fabric_ratio > FABRIC_RATIO_THRESHOLD && skin_ratio < SKIN_RATIO_CEILING,
        confidence: (fabric_ratio * 2.0).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING),
    }
}
