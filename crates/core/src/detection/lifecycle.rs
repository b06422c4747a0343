//! Backend initialization state machine: bounded retries, per-model
//! timeouts, permanent fallback after the retry budget is spent.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::detection::domain::backend::{BackendError, BackendLoader, LoadedBackends};
use crate::shared::constants::{
    BACKEND_READY_TIMEOUT_MS, INIT_MAX_ATTEMPTS, INIT_RETRY_BACKOFF_MS, MODEL_LOAD_TIMEOUT_MS,
};

/// Process-wide backend readiness. Transitions are monotonic forward, except
/// that `Initializing` may repeat up to the retry bound before the state is
/// forced to `Ready { real: false }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelState {
    Uninitialized,
    Initializing { attempt: u32 },
    Ready { real: bool },
}

/// Snapshot exposed to callers and the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadinessStatus {
    pub ready: bool,
    pub real: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct LifecycleConfig {
    pub ready_timeout: Duration,
    pub model_timeout: Duration,
    pub retry_backoff: Duration,
    pub max_attempts: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_millis(BACKEND_READY_TIMEOUT_MS),
            model_timeout: Duration::from_millis(MODEL_LOAD_TIMEOUT_MS),
            retry_backoff: Duration::from_millis(INIT_RETRY_BACKOFF_MS),
            max_attempts: INIT_MAX_ATTEMPTS,
        }
    }
}

pub struct ModelLifecycle {
    loader: Arc<dyn BackendLoader>,
    config: LifecycleConfig,
    state: ModelState,
}

impl ModelLifecycle {
    pub fn new(loader: Arc<dyn BackendLoader>, config: LifecycleConfig) -> Self {
        Self {
            loader,
            config,
            state: ModelState::Uninitialized,
        }
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    /// True in either real or fallback mode.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready { .. })
    }

    /// True when at least one model loaded.
    pub fn has_real_models(&self) -> bool {
        matches!(self.state, ModelState::Ready { real: true })
    }

    pub fn status(&self) -> ReadinessStatus {
        ReadinessStatus {
            ready: self.is_ready(),
            real: self.has_real_models(),
        }
    }

    /// Drives the backend to `Ready`. No-op when already there.
    ///
    /// Each attempt bounds `ready()` by `ready_timeout`; on readiness, both
    /// model loads run concurrently under independent deadlines, and a load
    /// that fails or times out degrades that capability only (the adapter
    /// keeps its synthetic path for it). When every attempt fails, the state
    /// is forced to `Ready { real: false }` and the one `Unavailable` error
    /// is returned for the caller to surface; the session stays usable in
    /// fallback mode from then on.
    pub fn initialize(&mut self) -> Result<LoadedBackends, BackendError> {
        if self.is_ready() {
            return Ok(LoadedBackends::default());
        }

        for attempt in 1..=self.config.max_attempts {
            self.state = ModelState::Initializing { attempt };
            log::info!(
                "initializing detection backend (attempt {attempt}/{})",
                self.config.max_attempts
            );

            match self.try_ready() {
                Ok(()) => {
                    let backends = self.load_models();
                    let real = backends.any_loaded();
                    self.state = ModelState::Ready { real };
                    log::info!("detection backend ready (real models: {real})");
                    return Ok(backends);
                }
                Err(e) => {
                    log::warn!("backend initialization attempt {attempt} failed: {e}");
                    if attempt < self.config.max_attempts {
                        thread::sleep(self.config.retry_backoff);
                    }
                }
            }
        }

        self.state = ModelState::Ready { real: false };
        Err(BackendError::Unavailable {
            attempts: self.config.max_attempts,
        })
    }

    fn try_ready(&self) -> Result<(), BackendError> {
        let loader = Arc::clone(&self.loader);
        let (tx, rx) = crossbeam_channel::bounded(1);
        // The worker is detached: on timeout its eventual result is simply
        // dropped with the channel.
        thread::spawn(move || {
            let _ = tx.send(loader.ready());
        });
        match rx.recv_timeout(self.config.ready_timeout) {
            Ok(result) => result,
            Err(_) => Err(BackendError::LoadTimeout {
                model: "backend readiness",
                timeout_ms: self.config.ready_timeout.as_millis() as u64,
            }),
        }
    }

    /// Spawns both loads before waiting so they overlap; each gets the same
    /// wall-clock deadline measured from now.
    fn load_models(&self) -> LoadedBackends {
        let timeout_ms = self.config.model_timeout.as_millis() as u64;
        let deadline = Instant::now() + self.config.model_timeout;

        let (obj_tx, obj_rx) = crossbeam_channel::bounded(1);
        let loader = Arc::clone(&self.loader);
        thread::spawn(move || {
            let _ = obj_tx.send(loader.load_object_backend());
        });

        let (face_tx, face_rx) = crossbeam_channel::bounded(1);
        let loader = Arc::clone(&self.loader);
        thread::spawn(move || {
            let _ = face_tx.send(loader.load_face_backend());
        });

        let objects = match obj_rx.recv_deadline(deadline) {
            Ok(Ok(backend)) => Some(backend),
            Ok(Err(e)) => {
                log::warn!("object model unavailable: {e}");
                None
            }
            Err(_) => {
                log::warn!(
                    "{}",
                    BackendError::LoadTimeout {
                        model: "object model",
                        timeout_ms,
                    }
                );
                None
            }
        };

        let faces = match face_rx.recv_deadline(deadline) {
            Ok(Ok(backend)) => Some(backend),
            Ok(Err(e)) => {
                log::warn!("face model unavailable: {e}");
                None
            }
            Err(_) => {
                log::warn!(
                    "{}",
                    BackendError::LoadTimeout {
                        model: "face model",
                        timeout_ms,
                    }
                );
                None
            }
        };

        LoadedBackends { objects, faces }
    }
}
