//! The per-tick orchestrator: throttled detection, last-known-good reuse,
//! and per-module aggregation.

use std::time::{Duration, Instant};

use crate::detection::adapter::DetectionAdapter;
use crate::detection::domain::backend::LoadedBackends;
use crate::monitoring::module::{self, ModuleAnalysisResult, MonitorModule};
use crate::runtime::session_logger::SessionLogger;
use crate::runtime::throttle::DetectionThrottle;
use crate::shared::constants::DETECT_MIN_INTERVAL_MS;
use crate::shared::detection::{Detection, FaceDetection};
use crate::shared::frame::Frame;

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Minimum wall-clock spacing between detection passes.
    pub detect_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            detect_interval: Duration::from_millis(DETECT_MIN_INTERVAL_MS),
        }
    }
}

/// What one tick produced. Detections are the retained last-known-good sets
/// when `ran_detection` is false.
#[derive(Debug)]
pub struct TickResult {
    pub objects: Vec<Detection>,
    pub faces: Vec<FaceDetection>,
    pub report: ModuleAnalysisResult,
    pub ran_detection: bool,
}

/// Owns the detection stack and the retained detection state for one
/// monitoring session. The caller drives `tick` once per display refresh;
/// everything inside is failure-absorbing, so a tick never errors.
pub struct MonitorSession {
    adapter: DetectionAdapter,
    throttle: DetectionThrottle,
    module: MonitorModule,
    logger: Box<dyn SessionLogger>,
    last_objects: Vec<Detection>,
    last_faces: Vec<FaceDetection>,
    last_report: Option<ModuleAnalysisResult>,
    tick_index: usize,
}

impl MonitorSession {
    pub fn new(
        adapter: DetectionAdapter,
        module: MonitorModule,
        config: SessionConfig,
        logger: Box<dyn SessionLogger>,
    ) -> Self {
        Self {
            adapter,
            throttle: DetectionThrottle::new(config.detect_interval),
            module,
            logger,
            last_objects: Vec::new(),
            last_faces: Vec::new(),
            last_report: None,
            tick_index: 0,
        }
    }

    pub fn module(&self) -> MonitorModule {
        self.module
    }

    /// Switches the active module between ticks; retained detections carry
    /// over, so the next tick aggregates immediately.
    pub fn set_module(&mut self, module: MonitorModule) {
        if self.module != module {
            self.module = module;
            self.last_report = None;
            self.logger.info(&format!("switched to {module} module"));
        }
    }

    /// Installs real backends mid-run (from a background initializer)
    /// without stalling the loop.
    pub fn attach_backends(&mut self, backends: LoadedBackends) {
        if backends.any_loaded() {
            self.logger.info("real detection backends attached");
        }
        self.adapter.attach(backends);
    }

    /// One loop iteration. Throttled ticks refresh the detection sets
    /// through the adapter (which absorbs every failure); skipped ticks
    /// reuse the previous sets.
    ///
    /// Aggregation follows detection cadence: the aggregators are pure, so
    /// re-running them on the retained sets would change nothing — except
    /// the safety module's O(width x height) pixel pass, which is exactly
    /// the work the throttle exists to bound. Skipped ticks reuse the
    /// retained report.
    pub fn tick(&mut self, frame: &Frame) -> TickResult {
        self.logger.tick(self.tick_index);
        self.tick_index += 1;

        let ran_detection = self.throttle.should_run(Instant::now());
        if ran_detection {
            let started = Instant::now();
            self.last_objects = self.adapter.detect_objects(frame);
            self.last_faces = self.adapter.detect_faces(frame);
            self.logger
                .timing("detect", started.elapsed().as_secs_f64() * 1000.0);
        }

        let report = match self.last_report.clone() {
            Some(report) if !ran_detection => report,
            _ => {
                let started = Instant::now();
                let report = module::analyze(
                    self.module,
                    &self.last_objects,
                    &self.last_faces,
                    Some(frame),
                );
                self.logger
                    .timing("aggregate", started.elapsed().as_secs_f64() * 1000.0);

                let module_name = self.module.to_string();
                for alert in report.alerts() {
                    self.logger.alert(&module_name, alert);
                }
                self.last_report = Some(report.clone());
                report
            }
        };

        TickResult {
            objects: self.last_objects.clone(),
            faces: self.last_faces.clone(),
            report,
            ran_detection,
        }
    }

    /// Emits the logger's end-of-session summary.
    pub fn finish(&self) {
        self.logger.summary();
    }
}
