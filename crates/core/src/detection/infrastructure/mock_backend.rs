//! Synthetic detections for fallback/demo mode.
//!
//! When the real backend is unavailable (or a call fails), the adapter
//! substitutes these so downstream aggregation stays exercised instead of
//! going dark. This is the only place in the engine where randomness lives.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shared::detection::{BoundingBox, Detection, FaceDetection};
use crate::shared::frame::Frame;

/// Probability a synthetic person appears on any given call.
const PERSON_PROBABILITY: f64 = 0.7;

/// Probability of one secondary object alongside.
const SECONDARY_PROBABILITY: f64 = 0.3;

/// Probability a synthetic face appears.
const FACE_PROBABILITY: f64 = 0.6;

const SECONDARY_LABELS: [&str; 4] = ["book", "laptop", "cell phone", "chair"];

pub struct MockBackend {
    rng: StdRng,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn objects(&mut self, frame: &Frame) -> Vec<Detection> {
        let fw = frame.width() as f64;
        let fh = frame.height() as f64;
        let mut detections = Vec::new();

        if self.rng.gen_bool(PERSON_PROBABILITY) {
            detections.push(Detection::new(
                "person",
                self.rng.gen_range(0.85..0.95),
                BoundingBox::new(fw * 0.3, fh * 0.15, fw * 0.25, fh * 0.7),
            ));
        }

        if self.rng.gen_bool(SECONDARY_PROBABILITY) {
            let label = SECONDARY_LABELS[self.rng.gen_range(0..SECONDARY_LABELS.len())];
            detections.push(Detection::new(
                label,
                self.rng.gen_range(0.5..0.85),
                BoundingBox::new(fw * 0.6, fh * 0.55, fw * 0.2, fh * 0.25),
            ));
        }

        detections
    }

    /// A single mock face with a fixed frame-relative box and landmark
    /// layout; only the mask reading is randomized. The adapter leaves these
    /// mask fields as-is (the heuristic runs only on real-backend faces).
    pub fn faces(&mut self, frame: &Frame) -> Vec<FaceDetection> {
        if !self.rng.gen_bool(FACE_PROBABILITY) {
            return Vec::new();
        }

        let fw = frame.width() as f64;
        let fh = frame.height() as f64;
        let (x1, y1) = (fw * 0.38, fh * 0.18);
        let (x2, y2) = (fw * 0.52, fh * 0.38);
        let w = x2 - x1;
        let h = y2 - y1;

        let mut face = FaceDetection::new((x1, y1), (x2, y2));
        face.landmarks = Some(vec![
            (x1 + w * 0.3, y1 + h * 0.35), // left eye
            (x1 + w * 0.7, y1 + h * 0.35), // right eye
            (x1 + w * 0.5, y1 + h * 0.55), // nose
            (x1 + w * 0.35, y1 + h * 0.75), // left mouth corner
            (x1 + w * 0.65, y1 + h * 0.75), // right mouth corner
        ]);
        face.landmark_scores = Some(vec![0.9; 5]);
        face.has_mask = Some(self.rng.gen_bool(0.5));
        face.mask_confidence = Some(self.rng.gen_range(0.5..0.95));
        vec![face]
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(vec![0u8; 640 * 480 * 3], 640, 480, 3, 0, 0.0)
    }

    #[test]
    fn test_objects_draw_from_the_allowed_set() {
        let mut mock = MockBackend::with_seed(7);
        let frame = frame();
        for _ in 0..200 {
            for det in mock.objects(&frame) {
                assert!(
                    det.label == "person" || SECONDARY_LABELS.contains(&det.label.as_str()),
                    "unexpected label {}",
                    det.label
                );
                assert!(det.bbox.is_valid());
                assert!(det.confidence > 0.3 && det.confidence < 1.0);
            }
        }
    }

    #[test]
    fn test_person_confidence_range() {
        let mut mock = MockBackend::with_seed(11);
        let frame = frame();
        let mut seen_person = false;
        for _ in 0..100 {
            for det in mock.objects(&frame) {
                if det.label == "person" {
                    seen_person = true;
                    assert!((0.85..0.95).contains(&det.confidence));
                }
            }
        }
        assert!(seen_person, "0.7 probability should fire within 100 draws");
    }

    #[test]
    fn test_person_appears_at_roughly_the_configured_rate() {
        let mut mock = MockBackend::with_seed(3);
        let frame = frame();
        let hits = (0..1000)
            .filter(|_| mock.objects(&frame).iter().any(|d| d.label == "person"))
            .count();
        // 0.7 +/- generous slack
        assert!((600..=800).contains(&hits), "got {hits}");
    }

    #[test]
    fn test_face_has_fixed_box_and_landmarks() {
        let mut mock = MockBackend::with_seed(5);
        let frame = frame();
        let mut boxes = Vec::new();
        for _ in 0..50 {
            for face in mock.faces(&frame) {
                assert_eq!(face.landmarks.as_ref().map(Vec::len), Some(5));
                assert_eq!(face.landmark_scores.as_ref().map(Vec::len), Some(5));
                assert!(face.has_mask.is_some());
                let conf = face.mask_confidence.unwrap();
                assert!((0.5..0.95).contains(&conf));
                boxes.push((face.top_left, face.bottom_right));
            }
        }
        assert!(!boxes.is_empty());
        assert!(boxes.iter().all(|b| *b == boxes[0]), "box must be fixed");
    }

    #[test]
    fn test_mask_flag_varies_across_draws() {
        let mut mock = MockBackend::with_seed(13);
        let frame = frame();
        let mut flags = std::collections::HashSet::new();
        for _ in 0..100 {
            for face in mock.faces(&frame) {
                flags.insert(face.has_mask.unwrap());
            }
        }
        assert_eq!(flags.len(), 2);
    }

    #[test]
    fn test_seeded_backends_are_reproducible() {
        let frame = frame();
        let mut a = MockBackend::with_seed(42);
        let mut b = MockBackend::with_seed(42);
        for _ in 0..20 {
            assert_eq!(a.objects(&frame), b.objects(&frame));
            assert_eq!(a.faces(&frame), b.faces(&frame));
        }
    }
}
