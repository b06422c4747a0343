use thiserror::Error;

use crate::shared::detection::{Detection, FaceDetection};
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum BackendError {
    /// A model (or backend readiness) did not complete within its timeout.
    #[error("{model} load timed out after {timeout_ms} ms")]
    LoadTimeout { model: &'static str, timeout_ms: u64 },
    /// Initialization failed past the retry bound; the session continues in
    /// fallback mode.
    #[error("detection backend unavailable after {attempts} initialization attempts")]
    Unavailable { attempts: u32 },
    /// A single detection call failed; recovered at the adapter.
    #[error("detection call failed: {0}")]
    Call(String),
}

/// Object detection over a single frame.
///
/// Implementations may be stateful (sessions, warmed buffers), hence
/// `&mut self`.
pub trait ObjectBackend: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, BackendError>;
}

/// Face detection over a single frame.
pub trait FaceBackend: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, BackendError>;
}

/// The external detection capability: backend readiness plus per-model
/// loading.
///
/// Loads are untrusted and may hang or fail; `ModelLifecycle` enforces
/// timeouts from the outside — implementations need not bound themselves.
pub trait BackendLoader: Send + Sync {
    fn ready(&self) -> Result<(), BackendError>;
    fn load_object_backend(&self) -> Result<Box<dyn ObjectBackend>, BackendError>;
    fn load_face_backend(&self) -> Result<Box<dyn FaceBackend>, BackendError>;
}

/// Whatever the lifecycle managed to load; a missing capability leaves the
/// adapter on its synthetic path.
#[derive(Default)]
pub struct LoadedBackends {
    pub objects: Option<Box<dyn ObjectBackend>>,
    pub faces: Option<Box<dyn FaceBackend>>,
}

impl LoadedBackends {
    pub fn any_loaded(&self) -> bool {
        self.objects.is_some() || self.faces.is_some()
    }
}

impl std::fmt::Debug for LoadedBackends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedBackends")
            .field("objects", &self.objects.is_some())
            .field("faces", &self.faces.is_some())
            .finish()
    }
}
