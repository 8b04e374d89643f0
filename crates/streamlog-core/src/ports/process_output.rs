//! Process output port.
//!
//! The supervisor that owns a child process hands its output stream to the
//! forwarder through this trait. Spawning, signalling and reaping stay with
//! the supervisor.

use tokio::io::AsyncRead;
use tokio::process::{Child, ChildStdout};

/// Port exposing the readable output stream of a running process.
pub trait ProcessOutputPort {
    /// The byte stream of the process output.
    type Output: AsyncRead + Unpin + Send + 'static;

    /// Hand out the output stream.
    ///
    /// Returns `None` when no stream is available, e.g. the output was not
    /// piped or has already been taken by another reader.
    fn output(&mut self) -> Option<Self::Output>;
}

/// A spawned child gives up its piped stdout.
///
/// Spawn with `Stdio::piped()` and redirect stderr into stdout (e.g.
/// `2>&1` through a shell) to capture combined output.
impl ProcessOutputPort for Child {
    type Output = ChildStdout;

    fn output(&mut self) -> Option<Self::Output> {
        self.stdout.take()
    }
}

/// A bare stream slot, handed out at most once.
impl<R> ProcessOutputPort for Option<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    type Output = R;

    fn output(&mut self) -> Option<Self::Output> {
        self.take()
    }
}
