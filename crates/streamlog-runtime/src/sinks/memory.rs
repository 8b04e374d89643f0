//! In-memory log capture.
//!
//! Keeps the most recent lines in a ring buffer and rebroadcasts every line
//! to live subscribers (e.g. a UI tailing a process).

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use streamlog_core::LogSinkPort;
use tokio::sync::broadcast;

/// Maximum number of lines kept by [`MemoryLogSink::new`].
pub const DEFAULT_MAX_LINES: usize = 5000;

/// Broadcast channel capacity for live subscribers
const CHANNEL_CAPACITY: usize = 1000;

/// A captured line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Unix timestamp in milliseconds
    pub timestamp_ms: i64,
    /// The line content
    pub line: String,
}

impl LogLine {
    /// Create a line stamped with the current time
    pub fn new(line: String) -> Self {
        Self {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            line,
        }
    }
}

/// Ring buffer sink: oldest lines are evicted once `max_lines` is reached.
#[derive(Debug)]
pub struct MemoryLogSink {
    lines: Mutex<VecDeque<LogLine>>,
    max_lines: usize,
    broadcast_tx: broadcast::Sender<LogLine>,
}

impl MemoryLogSink {
    /// Create a sink keeping up to [`DEFAULT_MAX_LINES`] lines.
    pub fn new() -> Self {
        Self::with_max_lines(DEFAULT_MAX_LINES)
    }

    /// Create a sink keeping up to `max_lines` lines (at least one).
    pub fn with_max_lines(max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);
        let (broadcast_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            lines: Mutex::new(VecDeque::with_capacity(max_lines.min(DEFAULT_MAX_LINES))),
            max_lines,
            broadcast_tx,
        }
    }

    fn buffer(&self) -> MutexGuard<'_, VecDeque<LogLine>> {
        // A panicking writer cannot leave the deque half-updated.
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All buffered lines, oldest first
    pub fn lines(&self) -> Vec<LogLine> {
        self.buffer().iter().cloned().collect()
    }

    /// Buffered line contents, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.buffer().iter().map(|l| l.line.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub const fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Drop all buffered lines
    pub fn clear(&self) {
        self.buffer().clear();
    }

    /// Receive lines recorded from now on
    pub fn subscribe(&self) -> broadcast::Receiver<LogLine> {
        self.broadcast_tx.subscribe()
    }
}

impl Default for MemoryLogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSinkPort for MemoryLogSink {
    fn info(&self, message: String) {
        let entry = LogLine::new(message);

        {
            let mut lines = self.buffer();
            if lines.len() >= self.max_lines {
                lines.pop_front();
            }
            lines.push_back(entry.clone());
        }

        // Ignore if no receivers
        let _ = self.broadcast_tx.send(entry);
    }
}
