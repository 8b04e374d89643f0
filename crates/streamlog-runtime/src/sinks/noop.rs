use streamlog_core::LogSinkPort;

/// A no-op log sink that discards all lines.
///
/// Useful when the output only needs draining so the child does not block
/// on a full pipe.
#[derive(Debug, Clone, Default)]
pub struct NoopLogSink;

impl LogSinkPort for NoopLogSink {
    fn info(&self, _message: String) {}
}
