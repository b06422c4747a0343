use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Cross-cutting observer for frame-loop events.
///
/// Decouples the session from specific output mechanisms (stdout, GUI
/// signals, log crate) so embedders can observe loop behavior without
/// changing the orchestration code.
pub trait SessionLogger: Send {
    /// Called once per loop tick.
    fn tick(&mut self, index: usize);

    /// Record how long a named stage took for one tick.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record an alert emitted by the active module.
    fn alert(&mut self, module: &str, message: &str);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events. Used by embedders with their own
/// observability and by tests where logger output is irrelevant.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn tick(&mut self, _index: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn alert(&mut self, _module: &str, _message: &str) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger: per-stage timing stats, per-module alert counts, and
/// a summary report at session end.
///
/// Tick output is throttled to every `throttle_ticks` ticks; each distinct
/// alert message is logged once on first occurrence and counted thereafter.
pub struct StdoutSessionLogger {
    throttle_ticks: usize,
    timings: HashMap<String, Vec<f64>>,
    alert_counts: HashMap<String, usize>,
    announced: HashSet<String>,
    start_time: Instant,
    ticks_seen: usize,
}

impl StdoutSessionLogger {
    pub fn new(throttle_ticks: usize) -> Self {
        Self {
            throttle_ticks: throttle_ticks.max(1),
            timings: HashMap::new(),
            alert_counts: HashMap::new(),
            announced: HashSet::new(),
            start_time: Instant::now(),
            ticks_seen: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.ticks_seen == 0 && self.timings.is_empty() && self.alert_counts.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = Vec::new();
        lines.push(format!(
            "Session summary ({} ticks, {elapsed_s:.1}s total):",
            self.ticks_seen
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len() as f64;
            lines.push(format!(
                "  {stage:10}: avg {avg_ms:6.2}ms over {} runs",
                durations.len()
            ));
        }

        let mut alerts: Vec<_> = self.alert_counts.iter().collect();
        alerts.sort();
        for (message, count) in alerts {
            lines.push(format!("  alert x{count}: {message}"));
        }

        if self.ticks_seen > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} ticks/s",
                self.ticks_seen as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn alert_count(&self, module: &str, message: &str) -> usize {
        self.alert_counts
            .get(&alert_key(module, message))
            .copied()
            .unwrap_or(0)
    }
}

impl Default for StdoutSessionLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

fn alert_key(module: &str, message: &str) -> String {
    format!("[{module}] {message}")
}

impl SessionLogger for StdoutSessionLogger {
    fn tick(&mut self, index: usize) {
        self.ticks_seen += 1;
        if index % self.throttle_ticks == 0 {
            log::debug!("tick {index}");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn alert(&mut self, module: &str, message: &str) {
        let key = alert_key(module, message);
        if self.announced.insert(key.clone()) {
            log::warn!("{key}");
        }
        *self.alert_counts.entry(key).or_default() += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}
