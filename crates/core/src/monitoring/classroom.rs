//! Classroom monitoring: attendance and attention estimation.

use crate::monitoring::counts::{count_label, CELL_PHONE, LAPTOP, PERSON};
use crate::shared::detection::{Detection, FaceDetection};

/// Students facing the camera below this ratio triggers the attention alert.
const LOW_FACE_RATIO: f64 = 0.7;

const LAPTOP_ALERT_THRESHOLD: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct ClassroomReport {
    pub student_count: usize,
    /// Faces seen / students present, in [0, 1].
    pub face_ratio: f64,
    /// In [0, 100].
    pub attention_level: u32,
    pub phone_count: usize,
    pub laptop_count: usize,
    pub alerts: Vec<String>,
}

pub fn analyze(objects: &[Detection], faces: &[FaceDetection]) -> ClassroomReport {
    let person_count = count_label(objects, PERSON);
    let face_count = faces.len();
    let student_count = person_count.max(face_count);
    let face_ratio = if student_count == 0 {
        0.0
    } else {
        face_count as f64 / student_count as f64
    };

    let phone_count = count_label(objects, CELL_PHONE);
    let laptop_count = count_label(objects, LAPTOP);

    // Distractions subtract from a face-ratio-driven baseline.
    let penalty = phone_count as f64 * 10.0 + laptop_count as f64 * 5.0;
    let attention_level = (face_ratio * 85.0 - penalty).clamp(0.0, 100.0).round() as u32;

    let mut alerts = Vec::new();
    if phone_count > 0 {
        alerts.push(format!("{phone_count} mobile phone(s) detected"));
    }
    if laptop_count > LAPTOP_ALERT_THRESHOLD {
        alerts.push(format!("High laptop usage: {laptop_count} laptops open"));
    }
    if student_count > 0 && face_ratio < LOW_FACE_RATIO {
        alerts.push(format!(
            "Low attention: only {:.0}% of students facing the camera",
            face_ratio * 100.0
        ));
    }

    ClassroomReport {
        student_count,
        face_ratio,
        attention_level,
        phone_count,
        laptop_count,
        alerts,
    }
}
