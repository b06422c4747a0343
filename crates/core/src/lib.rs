//! Vigil core: live frame analysis and heuristic classification.
//!
//! Ingests a frame stream, obtains object and face detections from a
//! pluggable backend (with a synthetic fallback), runs pixel-level heuristic
//! classifiers for facial coverings and fire/smoke, and aggregates raw
//! detections into per-module metrics and alerts.
//!
//! Layering follows bounded contexts: `shared` value types, pure `analysis`
//! classifiers, the `detection` backend stack (traits, ONNX adapters, mock,
//! lifecycle), `monitoring` aggregators, and the `runtime` frame loop.

pub mod analysis;
pub mod detection;
pub mod monitoring;
pub mod runtime;
pub mod shared;
