//! Configuration for a stream logger.
//!
//! Defaults reproduce the plain behaviour: strict UTF-8, unterminated
//! trailing fragments dropped at end-of-stream.

use serde::{Deserialize, Serialize};

/// Label used in tracing output when none is configured.
pub const DEFAULT_LABEL: &str = "process";

/// Initial capacity of the per-line read buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// What to do with bytes after the last line terminator at end-of-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingFragment {
    /// Drop the fragment; only terminated lines are forwarded.
    #[default]
    Discard,
    /// Forward the fragment as a final line.
    Emit,
}

/// How line bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDecoding {
    /// Invalid UTF-8 fails the invocation.
    #[default]
    Strict,
    /// Invalid sequences become U+FFFD and forwarding continues.
    Lossy,
}

/// Settings for one stream logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamLoggerConfig {
    /// Name of the stream in tracing output (e.g. the process name).
    pub label: String,
    /// Policy for an unterminated fragment at end-of-stream.
    pub trailing_fragment: TrailingFragment,
    /// Text decoding mode.
    pub decoding: LineDecoding,
    /// Pre-allocated size of the line buffer in bytes.
    pub initial_buffer_capacity: usize,
}

impl StreamLoggerConfig {
    /// Create a configuration with defaults and the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the trailing fragment policy.
    #[must_use]
    pub const fn with_trailing_fragment(mut self, policy: TrailingFragment) -> Self {
        self.trailing_fragment = policy;
        self
    }

    /// Set the decoding mode.
    #[must_use]
    pub const fn with_decoding(mut self, decoding: LineDecoding) -> Self {
        self.decoding = decoding;
        self
    }

    /// Set the initial line buffer capacity.
    #[must_use]
    pub const fn with_initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.initial_buffer_capacity = capacity;
        self
    }
}

impl Default for StreamLoggerConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            trailing_fragment: TrailingFragment::default(),
            decoding: LineDecoding::default(),
            initial_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}
