//! Label-counting helpers shared by the module aggregators.

use crate::shared::detection::Detection;

pub const PERSON: &str = "person";
pub const CELL_PHONE: &str = "cell phone";
pub const BOOK: &str = "book";
pub const LAPTOP: &str = "laptop";
pub const CHAIR: &str = "chair";
pub const BENCH: &str = "bench";
pub const COUCH: &str = "couch";
pub const BACKPACK: &str = "backpack";
pub const HANDBAG: &str = "handbag";
pub const SUITCASE: &str = "suitcase";
pub const FIRE_EXTINGUISHER: &str = "fire extinguisher";

pub fn count_label(detections: &[Detection], label: &str) -> usize {
    detections.iter().filter(|d| d.label == label).count()
}

/// Carried items that read as bags. COCO has no single "bag" class.
pub fn count_bags(detections: &[Detection]) -> usize {
    detections
        .iter()
        .filter(|d| matches!(d.label.as_str(), BACKPACK | HANDBAG | SUITCASE))
        .count()
}
