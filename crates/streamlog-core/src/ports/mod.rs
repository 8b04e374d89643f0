//! Port definitions (trait abstractions) for the log forwarder's collaborators.
//!
//! # Design Rules
//!
//! - One capability per trait, injected into the forwarder
//! - No formatting, rotation or persistence concerns in the sink port
//! - The process port hands out a stream; it never exposes process control

pub mod log_sink;
pub mod process_output;

pub use log_sink::LogSinkPort;
pub use process_output::ProcessOutputPort;

#[cfg(any(test, feature = "test-utils"))]
pub use log_sink::MockLogSinkPort;
