//! Core domain types and ports for streaming child-process output into logs.
//!
//! This crate holds no I/O loops. It defines the capabilities a log
//! forwarder needs from its collaborators (`ports`), the single-resolution
//! [`CompletionSignal`] that reports when a stream has been drained, and the
//! configuration and error types shared with the runtime adapters in
//! `streamlog-runtime`.
#![deny(unused_crate_dependencies)]

pub mod completion;
pub mod config;
pub mod error;
pub mod ports;

pub use completion::{CompletionOutcome, CompletionResolver, CompletionSignal, completion_channel};
pub use config::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_LABEL, LineDecoding, StreamLoggerConfig, TrailingFragment,
};
pub use error::StreamLogError;
pub use ports::{LogSinkPort, ProcessOutputPort};

#[cfg(any(test, feature = "test-utils"))]
pub use ports::MockLogSinkPort;
