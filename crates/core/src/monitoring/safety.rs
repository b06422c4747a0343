//! Safety monitoring: fire/smoke, crowding, and hazard indicators.

use crate::analysis::fire_smoke_detector::{self, FireSmokeReading};
use crate::monitoring::counts::{count_bags, count_label, FIRE_EXTINGUISHER, PERSON};
use crate::shared::detection::{Detection, FaceDetection};
use crate::shared::frame::Frame;

const HIGH_OCCUPANCY: usize = 10;
const CROWD_LIMIT: usize = 20;

/// Escalating operating state; fire takes absolute priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemStatus {
    Operational,
    Warning,
    Crowded,
    Emergency,
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemStatus::Operational => write!(f, "operational"),
            SystemStatus::Warning => write!(f, "warning"),
            SystemStatus::Crowded => write!(f, "crowded"),
            SystemStatus::Emergency => write!(f, "emergency"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SafetyReport {
    pub people_count: usize,
    pub fire_detected: bool,
    pub smoke_detected: bool,
    pub system_status: SystemStatus,
    /// Reported urgency indicator, not a measured latency.
    pub response_time: String,
    pub alerts: Vec<String>,
}

/// Runs the fire/smoke detector when a frame is available; without one, both
/// read negative for this tick.
pub fn analyze(
    objects: &[Detection],
    _faces: &[FaceDetection],
    frame: Option<&Frame>,
) -> SafetyReport {
    let people_count = count_label(objects, PERSON);
    let reading = frame
        .map(fire_smoke_detector::analyze)
        .unwrap_or(FireSmokeReading::default());
    let fire = reading.fire_detected;
    let smoke = reading.smoke_detected;

    let system_status = if fire {
        SystemStatus::Emergency
    } else if people_count > CROWD_LIMIT {
        SystemStatus::Crowded
    } else if smoke {
        SystemStatus::Warning
    } else {
        SystemStatus::Operational
    };

    let response_time = if fire || smoke {
        "0.1s"
    } else if people_count > CROWD_LIMIT {
        "0.5s"
    } else {
        "0.3s"
    }
    .to_string();

    let mut alerts = Vec::new();
    if fire {
        alerts.push("Fire detected: initiate emergency response".to_string());
    }
    if smoke {
        alerts.push("Smoke detected: investigate potential fire source".to_string());
    }
    if people_count > HIGH_OCCUPANCY {
        alerts.push(format!("High occupancy: {people_count} people in the area"));
    }
    if people_count > CROWD_LIMIT {
        alerts.push(format!(
            "Crowd safety risk: {people_count} people exceeds the safe threshold"
        ));
    }
    if count_bags(objects) > people_count {
        alerts.push("Possible unattended bags detected".to_string());
    }
    if count_label(objects, FIRE_EXTINGUISHER) == 0 {
        alerts.push("No fire extinguisher visible in the monitored area".to_string());
    }

    SafetyReport {
        people_count,
        fire_detected: fire,
        smoke_detected: smoke,
        system_status,
        response_time,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::detection::BoundingBox;

    fn det(label: &str) -> Detection {
        Detection::new(label, 0.9, BoundingBox::new(0.0, 0.0, 10.0, 10.0))
    }

    /// 100x100 frame fully covered in fire-colored pixels.
    fn fire_frame() -> Frame {
        let mut data = Vec::with_capacity(100 * 100 * 3);
        for _ in 0..100 * 100 {
            data.extend_from_slice(&[255, 150, 50]);
        }
        Frame::new(data, 100, 100, 3, 0, 0.0)
    }

    /// 100x100 frame fully covered in smoke-gray pixels.
    fn smoke_frame() -> Frame {
        Frame::new(vec![140u8; 100 * 100 * 3], 100, 100, 3, 0, 0.0)
    }

    /// Neither fire- nor smoke-colored anywhere.
    fn neutral_frame() -> Frame {
        let mut data = Vec::with_capacity(100 * 100 * 3);
        for _ in 0..100 * 100 {
            data.extend_from_slice(&[30, 90, 40]);
        }
        Frame::new(data, 100, 100, 3, 0, 0.0)
    }

    #[test]
    fn test_quiet_scene_is_operational() {
        let objects = vec![det(PERSON), det(FIRE_EXTINGUISHER)];
        let report = analyze(&objects, &[], Some(&neutral_frame()));

        assert_eq!(report.system_status, SystemStatus::Operational);
        assert_eq!(report.response_time, "0.3s");
        assert!(!report.fire_detected);
        assert!(!report.smoke_detected);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_fire_is_an_emergency() {
        let objects = vec![det(PERSON), det(FIRE_EXTINGUISHER)];
        let report = analyze(&objects, &[], Some(&fire_frame()));

        assert!(report.fire_detected);
        assert_eq!(report.system_status, SystemStatus::Emergency);
        assert_eq!(report.response_time, "0.1s");
        assert!(report.alerts[0].starts_with("Fire detected"));
    }

    #[test]
    fn test_smoke_is_a_warning() {
        let objects = vec![det(FIRE_EXTINGUISHER)];
        let report = analyze(&objects, &[], Some(&smoke_frame()));

        assert!(report.smoke_detected);
        assert!(!report.fire_detected);
        assert_eq!(report.system_status, SystemStatus::Warning);
        assert_eq!(report.response_time, "0.1s");
        assert!(report.alerts[0].starts_with("Smoke detected"));
    }

    #[test]
    fn test_crowding_outranks_smoke_but_not_fire() {
        let mut objects = vec![det(FIRE_EXTINGUISHER)];
        objects.extend(std::iter::repeat_with(|| det(PERSON)).take(25));

        let report = analyze(&objects, &[], Some(&smoke_frame()));
        assert_eq!(report.system_status, SystemStatus::Crowded);

        let report = analyze(&objects, &[], Some(&fire_frame()));
        assert_eq!(report.system_status, SystemStatus::Emergency);
    }

    #[test]
    fn test_crowding_response_time() {
        let mut objects = vec![det(FIRE_EXTINGUISHER)];
        objects.extend(std::iter::repeat_with(|| det(PERSON)).take(25));
        let report = analyze(&objects, &[], Some(&neutral_frame()));

        assert_eq!(report.system_status, SystemStatus::Crowded);
        assert_eq!(report.response_time, "0.5s");
        assert!(report
            .alerts
            .iter()
            .any(|a| a.starts_with("High occupancy: 25")));
        assert!(report
            .alerts
            .iter()
            .any(|a| a.starts_with("Crowd safety risk: 25")));
    }

    #[test]
    fn test_high_occupancy_without_crowding() {
        let mut objects = vec![det(FIRE_EXTINGUISHER)];
        objects.extend(std::iter::repeat_with(|| det(PERSON)).take(12));
        let report = analyze(&objects, &[], Some(&neutral_frame()));

        assert_eq!(report.system_status, SystemStatus::Operational);
        assert_eq!(report.alerts.len(), 1);
        assert!(report.alerts[0].starts_with("High occupancy"));
    }

    #[test]
    fn test_unattended_bags_alert() {
        let objects = vec![
            det(PERSON),
            det("backpack"),
            det("suitcase"),
            det(FIRE_EXTINGUISHER),
        ];
        let report = analyze(&objects, &[], Some(&neutral_frame()));
        assert!(report
            .alerts
            .iter()
            .any(|a| a.contains("unattended bags")));
    }

    #[test]
    fn test_missing_extinguisher_alert() {
        let report = analyze(&[det(PERSON)], &[], Some(&neutral_frame()));
        assert!(report
            .alerts
            .iter()
            .any(|a| a.contains("No fire extinguisher")));
    }

    #[test]
    fn test_no_frame_reads_negative() {
        let report = analyze(&[det(FIRE_EXTINGUISHER)], &[], None);
        assert!(!report.fire_detected);
        assert!(!report.smoke_detected);
        assert_eq!(report.system_status, SystemStatus::Operational);
    }

    #[test]
    fn test_aggregator_is_idempotent() {
        let objects = vec![det(PERSON), det(FIRE_EXTINGUISHER)];
        let frame = smoke_frame();
        assert_eq!(
            analyze(&objects, &[], Some(&frame)),
            analyze(&objects, &[], Some(&frame))
        );
    }
}
