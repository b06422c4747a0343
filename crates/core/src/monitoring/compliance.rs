//! Mask-compliance monitoring over the faces carrying a usable reading.

use crate::monitoring::counts::{count_label, PERSON};
use crate::shared::detection::{Detection, FaceDetection};

/// A mask reading below this confidence is too weak to count either way.
const MIN_READING_CONFIDENCE: f64 = 0.5;

const COMPLIANCE_TARGET: f64 = 85.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ComplianceReport {
    pub people_count: usize,
    /// Faces with a defined mask flag at usable confidence.
    pub faces_analyzed: usize,
    pub masked_faces: usize,
    /// In [0, 100]; 0 when no face was analyzable.
    pub mask_compliance: f64,
    /// Not yet measured — reserved until a uniform classifier exists.
    pub uniform_compliance: Option<f64>,
    pub alerts: Vec<String>,
}

pub fn analyze(objects: &[Detection], faces: &[FaceDetection]) -> ComplianceReport {
    let people_count = count_label(objects, PERSON);

    let analyzed: Vec<&FaceDetection> = faces
        .iter()
        .filter(|f| {
            f.has_mask.is_some() && f.mask_confidence.unwrap_or(0.0) > MIN_READING_CONFIDENCE
        })
        .collect();
    let faces_analyzed = analyzed.len();
    let masked_faces = analyzed
        .iter()
        .filter(|f| f.has_mask == Some(true))
        .count();
    let mask_compliance = if faces_analyzed == 0 {
        0.0
    } else {
        masked_faces as f64 / faces_analyzed as f64 * 100.0
    };

    let mut alerts = Vec::new();
    if mask_compliance < COMPLIANCE_TARGET {
        alerts.push(format!(
            "Mask compliance at {mask_compliance:.0}%, below the {COMPLIANCE_TARGET:.0}% target"
        ));
    }
    if people_count > faces_analyzed {
        alerts.push(format!(
            "{} person(s) without a mask reading",
            people_count - faces_analyzed
        ));
    }

    ComplianceReport {
        people_count,
        faces_analyzed,
        masked_faces,
        mask_compliance,
        uniform_compliance: None,
        alerts,
    }
}
