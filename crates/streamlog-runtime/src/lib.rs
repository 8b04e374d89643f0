//! Tokio adapters for forwarding child-process output into log sinks.
//!
//! # Structure
//!
//! - `LineSplitter` - byte stream to terminator-stripped lines
//! - `StreamLogger` / `begin_logging` - one background task per stream,
//!   reporting through a `CompletionSignal`
//! - `sinks` - `TracingLogSink`, `MemoryLogSink`, `NoopLogSink`
#![deny(unsafe_code)]

mod logger;
pub mod sinks;
mod splitter;

pub use logger::{StreamLogger, begin_logging};
pub use sinks::{LogLine, MemoryLogSink, NoopLogSink, TracingLogSink};
pub use splitter::LineSplitter;

// Re-export the core types callers need alongside the runtime
pub use streamlog_core::{
    CompletionOutcome, CompletionSignal, LineDecoding, LogSinkPort, ProcessOutputPort,
    StreamLogError, StreamLoggerConfig, TrailingFragment,
};
