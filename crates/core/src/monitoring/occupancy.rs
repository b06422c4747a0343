//! Occupancy monitoring: seat inventory and utilization.

use crate::monitoring::counts::{count_label, BENCH, CHAIR, COUCH, PERSON};
use crate::shared::detection::{Detection, FaceDetection};

/// Seats per detected furniture item.
const SEATS_PER_BENCH: usize = 3;
const SEATS_PER_COUCH: usize = 4;

/// Floor for the capacity estimate when little furniture is visible.
const MIN_CAPACITY: usize = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyReport {
    pub occupancy: usize,
    pub total_seats: usize,
    pub max_capacity: usize,
    /// In [0, 100].
    pub occupancy_rate: f64,
    pub available_seats: usize,
    pub alerts: Vec<String>,
}

pub fn analyze(objects: &[Detection], _faces: &[FaceDetection]) -> OccupancyReport {
    let occupancy = count_label(objects, PERSON);
    let total_seats = count_label(objects, CHAIR)
        + count_label(objects, BENCH) * SEATS_PER_BENCH
        + count_label(objects, COUCH) * SEATS_PER_COUCH;
    let max_capacity = total_seats.max(MIN_CAPACITY);
    let occupancy_rate = (occupancy as f64 / max_capacity as f64 * 100.0).min(100.0);
    let available_seats = max_capacity.saturating_sub(occupancy);

    let mut alerts = Vec::new();
    if occupancy_rate > 95.0 {
        alerts.push(format!(
            "Critical occupancy: {occupancy_rate:.0}% of capacity"
        ));
    } else if occupancy_rate > 85.0 {
        alerts.push(format!("Occupancy warning: {occupancy_rate:.0}% of capacity"));
    } else if occupancy_rate > 70.0 {
        alerts.push(format!("Occupancy above 70%: {occupancy_rate:.0}%"));
    }
    if occupancy > max_capacity {
        alerts.push(format!(
            "Occupancy ({occupancy}) exceeds estimated capacity ({max_capacity})"
        ));
    }

    OccupancyReport {
        occupancy,
        total_seats,
        max_capacity,
        occupancy_rate,
        available_seats,
        alerts,
    }
}
