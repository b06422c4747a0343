pub const OBJECT_MODEL_NAME: &str = "yolo11n.onnx";
pub const OBJECT_MODEL_URL: &str =
    "https://github.com/vigil-monitor/vigil/releases/download/v0.1.0/yolo11n.onnx";

pub const FACE_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/vigil-monitor/vigil/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Object detections below this confidence are discarded at the adapter.
pub const MIN_OBJECT_CONFIDENCE: f64 = 0.3;

/// Detection passes are rate-limited to at most 10 per second, independent
/// of the render tick rate.
pub const DETECT_MIN_INTERVAL_MS: u64 = 100;

/// Bounded-retry policy for backend initialization.
pub const INIT_MAX_ATTEMPTS: u32 = 3;
pub const INIT_RETRY_BACKOFF_MS: u64 = 2_000;

/// Backend readiness is abandoned after this long per attempt.
pub const BACKEND_READY_TIMEOUT_MS: u64 = 10_000;

/// Each model load gets its own independent deadline.
pub const MODEL_LOAD_TIMEOUT_MS: u64 = 15_000;
