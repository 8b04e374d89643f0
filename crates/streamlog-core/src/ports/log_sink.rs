//! Log sink port for forwarded output lines.
//!
//! This port abstracts the destination of captured process output, allowing
//! different implementations for tracing, in-memory capture and tests.

/// Port for recording one line of process output at informational severity.
///
/// A single sink may be shared by several concurrent forwarders, so
/// implementations must be thread-safe. Calls should not block indefinitely:
/// the forwarder waits for each call to return before reading the next line.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait LogSinkPort: Send + Sync {
    /// Record a line of output.
    ///
    /// # Arguments
    ///
    /// * `message` - The line content, without its terminator
    fn info(&self, message: String);
}
