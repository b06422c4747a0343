use std::time::{Duration, Instant};

use crate::shared::constants::DETECT_MIN_INTERVAL_MS;

/// Wall-clock gate keeping detection at or under a fixed rate, independent
/// of how fast the render loop ticks.
///
/// Takes `now` explicitly so cadence is testable without sleeping.
pub struct DetectionThrottle {
    min_interval: Duration,
    last_run: Option<Instant>,
}

impl DetectionThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_run: None,
        }
    }

    /// True when enough time has passed since the last granted run; granting
    /// consumes the window.
    pub fn should_run(&mut self, now: Instant) -> bool {
        match self.last_run {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_run = Some(now);
                true
            }
        }
    }
}

impl Default for DetectionThrottle {
    fn default() -> Self {
        Self::new(Duration::from_millis(DETECT_MIN_INTERVAL_MS))
    }
}
