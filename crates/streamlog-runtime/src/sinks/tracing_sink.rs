use streamlog_core::{DEFAULT_LABEL, LogSinkPort};
use tracing::info;

/// Log sink that emits each line as an `INFO` tracing event.
///
/// Events carry a `source` field so output from several processes can be
/// told apart in one subscriber.
#[derive(Debug, Clone)]
pub struct TracingLogSink {
    label: String,
}

impl TracingLogSink {
    /// Create a sink tagging events with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The `source` field value of emitted events.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for TracingLogSink {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

impl LogSinkPort for TracingLogSink {
    fn info(&self, message: String) {
        info!(source = %self.label, "{}", message);
    }
}
