//! Cooperative cancellation for blocked callers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag that asks a blocked caller to abandon its wait.
///
/// Clones share the flag. Waiters poll it between timed waits, so a
/// cancellation is observed within one poll interval. A wait that has
/// already been granted completes normally even if the token fires later.
///
/// # Cost
///
/// Firing the token does not wake anyone. Every blocked caller wakes once
/// per poll interval whether or not a token fired: a coordinator waiter
/// re-takes the coordination lock and a layer waiter retries its layer
/// lock. With `w` blocked callers that is `w` lock acquisitions per
/// interval. A longer
/// [`poll_interval`](crate::CoordinatorConfig::poll_interval) lowers that
/// traffic and raises cancellation latency by the same amount.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for callers that never cancel.
    pub fn never() -> Self {
        Self::default()
    }

    /// Fire the token. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
