use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::{Receiver, TryRecvError};
use serde::Deserialize;

use vigil_core::detection::adapter::DetectionAdapter;
use vigil_core::detection::domain::backend::{BackendError, LoadedBackends};
use vigil_core::detection::infrastructure::onnx_backend_loader::OnnxBackendLoader;
use vigil_core::detection::lifecycle::{LifecycleConfig, ModelLifecycle, ReadinessStatus};
use vigil_core::monitoring::module::{ModuleAnalysisResult, MonitorModule};
use vigil_core::runtime::frame_source::FrameSource;
use vigil_core::runtime::infrastructure::image_source::ImageSource;
use vigil_core::runtime::infrastructure::synthetic_source::{Scene, SyntheticSource};
use vigil_core::runtime::session::{MonitorSession, SessionConfig, TickResult};
use vigil_core::runtime::session_logger::StdoutSessionLogger;

/// Live scene monitoring over a frame stream.
#[derive(Parser)]
#[command(name = "vigil")]
struct Cli {
    /// Monitoring module: classroom, exam, occupancy, compliance, safety
    /// (default: classroom).
    #[arg(long)]
    module: Option<String>,

    /// Frame source: synthetic or image (default: synthetic).
    #[arg(long)]
    source: Option<String>,

    /// Synthetic scene: neutral, fire, smoke (default: neutral).
    #[arg(long)]
    scene: Option<String>,

    /// Image file to replay as the frame stream (requires --source image).
    #[arg(long)]
    image: Option<PathBuf>,

    /// Ticks to run; 0 runs until interrupted (default: 300).
    #[arg(long)]
    frames: Option<usize>,

    /// Render tick rate (default: 30).
    #[arg(long)]
    fps: Option<u32>,

    /// Minimum interval between detection passes, in milliseconds
    /// (default: 100).
    #[arg(long)]
    detect_interval_ms: Option<u64>,

    /// Synthetic frame width (default: 640).
    #[arg(long)]
    width: Option<u32>,

    /// Synthetic frame height (default: 480).
    #[arg(long)]
    height: Option<u32>,

    /// Skip backend initialization and run on synthetic detections only.
    #[arg(long)]
    mock: bool,

    /// Directory with pre-downloaded model files.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Object detection confidence threshold (default: 0.25).
    #[arg(long)]
    confidence: Option<f64>,

    /// JSON config file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// File-backed presets for any CLI flag.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    module: Option<String>,
    source: Option<String>,
    scene: Option<String>,
    image: Option<PathBuf>,
    frames: Option<usize>,
    fps: Option<u32>,
    detect_interval_ms: Option<u64>,
    width: Option<u32>,
    height: Option<u32>,
    mock: Option<bool>,
    model_dir: Option<PathBuf>,
    confidence: Option<f64>,
}

struct Options {
    module: MonitorModule,
    source: String,
    scene: Scene,
    image: Option<PathBuf>,
    frames: usize,
    fps: u32,
    detect_interval_ms: u64,
    width: u32,
    height: u32,
    mock: bool,
    model_dir: Option<PathBuf>,
    confidence: f64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let opts = resolve(cli)?;
    let mut source = build_source(&opts)?;

    let mut session = MonitorSession::new(
        DetectionAdapter::new(),
        opts.module,
        SessionConfig {
            detect_interval: Duration::from_millis(opts.detect_interval_ms),
        },
        Box::new(StdoutSessionLogger::new(opts.fps.max(1) as usize)),
    );

    // Model init runs in the background; the loop starts immediately in
    // fallback mode and picks up real backends when they arrive.
    let mut init_rx = if opts.mock {
        log::info!("running with synthetic detections (--mock)");
        None
    } else {
        Some(spawn_initializer(&opts))
    };

    let frame_interval = Duration::from_secs_f64(1.0 / opts.fps.max(1) as f64);
    let mut tick = 0usize;

    while opts.frames == 0 || tick < opts.frames {
        let started = Instant::now();

        if let Some(rx) = &init_rx {
            let mut finished = false;
            match rx.try_recv() {
                Ok(outcome) => {
                    if let Some(e) = outcome.error {
                        log::warn!("continuing in fallback mode: {e}");
                    }
                    log::info!(
                        "model readiness: ready={} real={}",
                        outcome.status.ready,
                        outcome.status.real
                    );
                    session.attach_backends(outcome.backends);
                    finished = true;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => finished = true,
            }
            if finished {
                init_rx = None;
            }
        }

        match source.next_frame() {
            Ok(Some(frame)) => {
                let result = session.tick(&frame);
                if tick % opts.fps.max(1) as usize == 0 {
                    log_report(&result);
                }
                tick += 1;
            }
            Ok(None) => {} // transiently unready; try again next tick
            Err(e) => log::warn!("frame source error: {e}"),
        }

        let elapsed = started.elapsed();
        if elapsed < frame_interval {
            thread::sleep(frame_interval - elapsed);
        }
    }

    session.finish();
    Ok(())
}

fn resolve(cli: Cli) -> Result<Options, Box<dyn std::error::Error>> {
    let file: FileConfig = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => FileConfig::default(),
    };

    let module = cli
        .module
        .or(file.module)
        .unwrap_or_else(|| "classroom".into())
        .parse::<MonitorModule>()?;
    let scene = cli
        .scene
        .or(file.scene)
        .unwrap_or_else(|| "neutral".into())
        .parse::<Scene>()?;

    let opts = Options {
        module,
        source: cli.source.or(file.source).unwrap_or_else(|| "synthetic".into()),
        scene,
        image: cli.image.or(file.image),
        frames: cli.frames.or(file.frames).unwrap_or(300),
        fps: cli.fps.or(file.fps).unwrap_or(30),
        detect_interval_ms: cli
            .detect_interval_ms
            .or(file.detect_interval_ms)
            .unwrap_or(100),
        width: cli.width.or(file.width).unwrap_or(640),
        height: cli.height.or(file.height).unwrap_or(480),
        mock: cli.mock || file.mock.unwrap_or(false),
        model_dir: cli.model_dir.or(file.model_dir),
        confidence: cli.confidence.or(file.confidence).unwrap_or(0.25),
    };
    validate(&opts)?;
    Ok(opts)
}

fn validate(opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&opts.confidence) {
        return Err("confidence must be between 0.0 and 1.0".into());
    }
    if opts.width < 3 || opts.height < 3 {
        return Err("frame dimensions must be at least 3x3".into());
    }
    match opts.source.as_str() {
        "synthetic" => Ok(()),
        "image" => {
            if opts.image.is_none() {
                Err("--source image requires --image PATH".into())
            } else {
                Ok(())
            }
        }
        other => Err(format!("unknown source: {other}").into()),
    }
}

fn build_source(opts: &Options) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    match opts.source.as_str() {
        "image" => {
            let path = opts.image.as_ref().expect("validated");
            let source = ImageSource::open(path)?;
            log::info!(
                "replaying {} ({}x{})",
                path.display(),
                source.width(),
                source.height()
            );
            Ok(Box::new(source))
        }
        _ => Ok(Box::new(SyntheticSource::new(
            opts.width,
            opts.height,
            opts.scene,
        ))),
    }
}

struct InitOutcome {
    backends: LoadedBackends,
    status: ReadinessStatus,
    error: Option<BackendError>,
}

fn spawn_initializer(opts: &Options) -> Receiver<InitOutcome> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let loader = Arc::new(OnnxBackendLoader::new(
        opts.model_dir.clone(),
        opts.confidence,
    ));

    thread::spawn(move || {
        let mut lifecycle = ModelLifecycle::new(loader, LifecycleConfig::default());
        let (backends, error) = match lifecycle.initialize() {
            Ok(backends) => (backends, None),
            Err(e) => (LoadedBackends::default(), Some(e)),
        };
        let _ = tx.send(InitOutcome {
            backends,
            status: lifecycle.status(),
            error,
        });
    });

    rx
}

fn log_report(result: &TickResult) {
    match &result.report {
        ModuleAnalysisResult::Classroom(r) => log::info!(
            "classroom: {} student(s), attention {}%, {} phone(s)",
            r.student_count,
            r.attention_level,
            r.phone_count
        ),
        ModuleAnalysisResult::Exam(r) => log::info!(
            "exam: {} candidate(s), gaze {:.0}%, {} prohibited item(s)",
            r.candidate_count,
            r.gaze_compliance,
            r.prohibited_items
        ),
        ModuleAnalysisResult::Occupancy(r) => log::info!(
            "occupancy: {}/{} ({:.0}%), {} seat(s) free",
            r.occupancy,
            r.max_capacity,
            r.occupancy_rate,
            r.available_seats
        ),
        ModuleAnalysisResult::Compliance(r) => log::info!(
            "compliance: {}/{} masked ({:.0}%)",
            r.masked_faces,
            r.faces_analyzed,
            r.mask_compliance
        ),
        ModuleAnalysisResult::Safety(r) => log::info!(
            "safety: status {}, {} people, fire={} smoke={} (response {})",
            r.system_status,
            r.people_count,
            r.fire_detected,
            r.smoke_detected,
            r.response_time
        ),
    }
}
