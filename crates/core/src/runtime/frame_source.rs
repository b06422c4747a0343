use crate::shared::frame::Frame;

/// Supplies frames at the caller's cadence.
///
/// `Ok(None)` means no frame is available right now (device warming up,
/// decoder catching up); the orchestrator skips that tick and tries again.
/// Errors are per-tick and recoverable — the loop logs and continues.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;
}
