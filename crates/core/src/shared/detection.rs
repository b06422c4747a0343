/// Bounding box in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Invariant required of every surfaced detection: positive area,
    /// non-negative origin. Violating boxes are discarded at the adapter
    /// boundary, never passed downstream.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.x >= 0.0 && self.y >= 0.0
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// A single object-class hypothesis with confidence and bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub label: String,
    /// In [0, 1].
    pub confidence: f64,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f64, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

/// A detected face with optional landmarks and mask reading.
///
/// The mask fields are written by the mask detector (real-backend path) or
/// the mock backend (fallback path) — never by the detection backends
/// themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceDetection {
    pub top_left: (f64, f64),
    pub bottom_right: (f64, f64),
    /// Ordered keypoints (eyes, nose, mouth corners). Points at (0, 0) are
    /// treated as invisible.
    pub landmarks: Option<Vec<(f64, f64)>>,
    /// Per-landmark probability, parallel to `landmarks`.
    pub landmark_scores: Option<Vec<f64>>,
    pub has_mask: Option<bool>,
    /// In [0, 1].
    pub mask_confidence: Option<f64>,
}

impl FaceDetection {
    pub fn new(top_left: (f64, f64), bottom_right: (f64, f64)) -> Self {
        Self {
            top_left,
            bottom_right,
            landmarks: None,
            landmark_scores: None,
            has_mask: None,
            mask_confidence: None,
        }
    }

    pub fn width(&self) -> f64 {
        (self.bottom_right.0 - self.top_left.0).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom_right.1 - self.top_left.1).max(0.0)
    }
}
