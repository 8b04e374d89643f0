//! Background forwarding of process output into a log sink.
//!
//! Each invocation spawns one tokio task that reads lines from the stream
//! and hands them to the sink one at a time, in order. The caller gets a
//! pending [`CompletionSignal`] back immediately.

use std::sync::Arc;

use futures_util::StreamExt;
use streamlog_core::{
    CompletionSignal, LogSinkPort, ProcessOutputPort, StreamLogError, StreamLoggerConfig,
    completion_channel,
};
use tokio::io::AsyncRead;
use tracing::{debug, warn};

use crate::splitter::LineSplitter;

/// Start forwarding the output of `process` to `sink` with default settings.
///
/// Must be called from within a tokio runtime.
pub fn begin_logging<P: ProcessOutputPort>(
    process: &mut P,
    sink: Arc<dyn LogSinkPort>,
) -> CompletionSignal {
    StreamLogger::new(sink).begin_logging(process)
}

/// Forwards process output streams into a shared log sink.
///
/// A logger can be reused for many streams; every call to
/// [`begin_logging`](Self::begin_logging) is an independent invocation with
/// its own task and completion signal.
#[derive(Clone)]
pub struct StreamLogger {
    config: StreamLoggerConfig,
    sink: Arc<dyn LogSinkPort>,
}

impl StreamLogger {
    /// Create a logger with default settings.
    pub fn new(sink: Arc<dyn LogSinkPort>) -> Self {
        Self::with_config(sink, StreamLoggerConfig::default())
    }

    /// Create a logger with explicit settings.
    pub fn with_config(sink: Arc<dyn LogSinkPort>, config: StreamLoggerConfig) -> Self {
        Self { config, sink }
    }

    /// The settings used for new invocations.
    pub const fn config(&self) -> &StreamLoggerConfig {
        &self.config
    }

    /// Take the output stream from `process` and start forwarding it.
    ///
    /// If the process has no output stream, the returned signal is already
    /// resolved to [`StreamLogError::OutputUnavailable`].
    pub fn begin_logging<P: ProcessOutputPort>(&self, process: &mut P) -> CompletionSignal {
        match process.output() {
            Some(stream) => self.begin_logging_stream(stream),
            None => {
                warn!(source = %self.config.label, "process has no output stream to log");
                CompletionSignal::resolved(Err(StreamLogError::OutputUnavailable))
            }
        }
    }

    /// Start forwarding an already-open stream.
    ///
    /// The signal resolves to `Ok(true)` at end-of-stream, or to the read or
    /// decode error that stopped forwarding. There is no retry and no
    /// cancellation; closing the stream is the way to stop early.
    pub fn begin_logging_stream<R>(&self, stream: R) -> CompletionSignal
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (resolver, signal) = completion_channel();
        let sink = Arc::clone(&self.sink);
        let config = self.config.clone();

        tokio::spawn(async move {
            debug!(source = %config.label, "output logging task started");
            let outcome = forward_lines(stream, sink.as_ref(), &config).await;

            if let Err(ref e) = outcome {
                warn!(source = %config.label, error = %e, "output logging stopped on error");
            }

            // Waiters must never race a sink call from this invocation.
            drop(sink);
            resolver.resolve(outcome);
            debug!(source = %config.label, "output logging task exiting");
        });

        signal
    }
}

/// Log every line of `stream`, each before the next is read.
async fn forward_lines<R>(
    stream: R,
    sink: &dyn LogSinkPort,
    config: &StreamLoggerConfig,
) -> Result<bool, StreamLogError>
where
    R: AsyncRead + Unpin,
{
    let lines = LineSplitter::with_config(stream, config).into_stream();
    futures_util::pin_mut!(lines);

    let mut forwarded: u64 = 0;
    while let Some(line) = lines.next().await {
        sink.info(line?);
        forwarded += 1;
    }

    debug!(source = %config.label, lines = forwarded, "output stream drained");
    Ok(true)
}
