//! Single-resolution completion signal.
//!
//! A forwarder holds the [`CompletionResolver`]; callers hold any number of
//! [`CompletionSignal`] clones. The signal starts pending and resolves
//! exactly once, to `Ok(true)` when the stream was drained or to the
//! [`StreamLogError`] that stopped it. Later resolutions are ignored.
//!
//! If the resolver is dropped while still pending (the logging task panicked
//! or the runtime shut down), every reader observes
//! [`StreamLogError::Aborted`] instead of waiting forever.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::StreamLogError;

/// Final outcome of a log forwarding invocation.
pub type CompletionOutcome = Result<bool, StreamLogError>;

/// Create a linked resolver and pending signal.
pub fn completion_channel() -> (CompletionResolver, CompletionSignal) {
    let (tx, rx) = watch::channel(None);
    (CompletionResolver { tx }, CompletionSignal { rx })
}

/// Write side of a completion signal.
#[derive(Debug)]
pub struct CompletionResolver {
    tx: watch::Sender<Option<CompletionOutcome>>,
}

impl CompletionResolver {
    /// Resolve the signal.
    ///
    /// Returns `true` if this call performed the resolution, `false` if the
    /// signal was already resolved (the stored outcome is left untouched).
    pub fn resolve(&self, outcome: CompletionOutcome) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        })
    }

    /// Resolve to success.
    pub fn succeed(&self) -> bool {
        self.resolve(Ok(true))
    }

    /// Resolve to failure.
    pub fn fail(&self, err: StreamLogError) -> bool {
        self.resolve(Err(err))
    }

    /// Whether the signal has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Another reader of the same signal.
    pub fn signal(&self) -> CompletionSignal {
        CompletionSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of a completion signal. Cheap to clone; all clones observe the
/// same single resolution.
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    rx: watch::Receiver<Option<CompletionOutcome>>,
}

impl CompletionSignal {
    /// A signal that is already resolved.
    pub fn resolved(outcome: CompletionOutcome) -> Self {
        let (tx, rx) = watch::channel(Some(outcome));
        drop(tx);
        Self { rx }
    }

    /// Current outcome without waiting, or `None` while pending.
    pub fn peek(&self) -> Option<CompletionOutcome> {
        if let Some(outcome) = self.rx.borrow().clone() {
            return Some(outcome);
        }
        // Once the resolver is gone the stored value is final.
        if self.rx.has_changed().is_err() {
            return Some(
                self.rx
                    .borrow()
                    .clone()
                    .unwrap_or(Err(StreamLogError::Aborted)),
            );
        }
        None
    }

    /// Whether the signal has reached a final outcome.
    pub fn is_done(&self) -> bool {
        self.peek().is_some()
    }

    /// Whether the signal is still pending.
    pub fn is_pending(&self) -> bool {
        !self.is_done()
    }

    /// Wait for the outcome.
    pub async fn wait(&self) -> CompletionOutcome {
        let mut rx = self.rx.clone();
        match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.clone().unwrap_or(Err(StreamLogError::Aborted)),
            Err(_) => Err(StreamLogError::Aborted),
        }
    }

    /// Wait for the outcome for at most `timeout`.
    ///
    /// Returns `None` if the timeout elapsed first. The signal, and the work
    /// behind it, are unaffected by the timeout.
    pub async fn wait_timeout(&self, timeout: Duration) -> Option<CompletionOutcome> {
        tokio::time::timeout(timeout, self.wait()).await.ok()
    }
}

impl IntoFuture for CompletionSignal {
    type Output = CompletionOutcome;
    type IntoFuture = Pin<Box<dyn Future<Output = CompletionOutcome> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}
