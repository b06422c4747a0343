//! `BackendLoader` over the ONNX Runtime stack: resolves model files
//! (cache, bundled dir, or download) and builds session-backed detectors.

use std::path::PathBuf;

use crate::detection::domain::backend::{
    BackendError, BackendLoader, FaceBackend, ObjectBackend,
};
use crate::shared::constants::{
    FACE_MODEL_NAME, FACE_MODEL_URL, OBJECT_MODEL_NAME, OBJECT_MODEL_URL,
};

use super::model_resolver;
use super::onnx_face_backend::{self, OnnxFaceBackend};
use super::onnx_object_backend::OnnxObjectBackend;

pub struct OnnxBackendLoader {
    bundled_dir: Option<PathBuf>,
    object_confidence: f64,
}

impl OnnxBackendLoader {
    pub fn new(bundled_dir: Option<PathBuf>, object_confidence: f64) -> Self {
        Self {
            bundled_dir,
            object_confidence,
        }
    }
}

impl BackendLoader for OnnxBackendLoader {
    /// Probes that the ONNX runtime is usable at all. Model resolution and
    /// session construction happen per model in `load_*`, each under its own
    /// lifecycle-enforced deadline.
    fn ready(&self) -> Result<(), BackendError> {
        ort::session::Session::builder()
            .map(|_| ())
            .map_err(|e| BackendError::Call(e.to_string()))
    }

    fn load_object_backend(&self) -> Result<Box<dyn ObjectBackend>, BackendError> {
        let path = model_resolver::resolve(
            OBJECT_MODEL_NAME,
            OBJECT_MODEL_URL,
            self.bundled_dir.as_deref(),
            None,
        )
        .map_err(|e| BackendError::Call(e.to_string()))?;
        log::info!("loading object model from {}", path.display());
        let backend = OnnxObjectBackend::new(&path, self.object_confidence)
            .map_err(|e| BackendError::Call(e.to_string()))?;
        Ok(Box::new(backend))
    }

    fn load_face_backend(&self) -> Result<Box<dyn FaceBackend>, BackendError> {
        let path = model_resolver::resolve(
            FACE_MODEL_NAME,
            FACE_MODEL_URL,
            self.bundled_dir.as_deref(),
            None,
        )
        .map_err(|e| BackendError::Call(e.to_string()))?;
        log::info!("loading face model from {}", path.display());
        let backend = OnnxFaceBackend::new(&path, onnx_face_backend::DEFAULT_CONFIDENCE)
            .map_err(|e| BackendError::Call(e.to_string()))?;
        Ok(Box::new(backend))
    }
}
