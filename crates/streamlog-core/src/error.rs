//! Error types for stream log forwarding.

use std::io;
use std::str::Utf8Error;
use std::sync::Arc;

use thiserror::Error;

/// Why a log forwarding invocation failed.
///
/// The error is `Clone` because every reader of a
/// [`CompletionSignal`](crate::CompletionSignal) observes the same cause.
#[derive(Debug, Clone, Error)]
pub enum StreamLogError {
    /// The underlying stream read failed (broken pipe, reset, ...).
    #[error("Read failed: {0}")]
    Read(#[source] Arc<io::Error>),

    /// A line was not valid UTF-8.
    #[error("Invalid UTF-8 on line {line}: {source}")]
    Decode {
        /// 1-based number of the offending line.
        line: u64,
        source: Utf8Error,
    },

    /// The process exposed no output stream to read from.
    #[error("Process output stream is not available")]
    OutputUnavailable,

    /// The logging task stopped without reporting an outcome.
    #[error("Logging task ended without completing")]
    Aborted,
}

impl StreamLogError {
    /// Kind of the underlying I/O error, if this is a read failure.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Read(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl From<io::Error> for StreamLogError {
    fn from(err: io::Error) -> Self {
        Self::Read(Arc::new(err))
    }
}
