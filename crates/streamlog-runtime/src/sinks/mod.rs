//! Log sink implementations.
//!
//! - `TracingLogSink` - forwards lines to the `tracing` facade
//! - `MemoryLogSink` - bounded in-memory buffer with live subscribers
//! - `NoopLogSink` - discards everything

mod memory;
mod noop;
mod tracing_sink;

pub use memory::{DEFAULT_MAX_LINES, LogLine, MemoryLogSink};
pub use noop::NoopLogSink;
pub use tracing_sink::TracingLogSink;
