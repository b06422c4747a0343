//! The cooperative frame loop: sources, throttling, session orchestration.

pub mod frame_source;
pub mod infrastructure;
pub mod session;
pub mod session_logger;
pub mod throttle;
