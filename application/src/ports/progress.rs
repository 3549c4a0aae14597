//! Retry progress port
//!
//! Reports retries of the answer-generation request so the console can tell
//! the user why nothing is happening.

use std::time::Duration;
use tutor_domain::RetryCause;

/// A retry about to happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryEvent {
    /// Failed attempts so far, including the one that triggered this retry
    pub attempt: u32,
    pub max_attempts: u32,
    pub cause: RetryCause,
    pub delay: Duration,
}

/// Callback for retry and request lifecycle updates
///
/// Implementations live in the presentation layer.
pub trait RetryNotifier: Send + Sync {
    /// Called before sleeping ahead of the next attempt
    fn on_retry(&self, event: &RetryEvent);

    /// Called when the retry budget is exhausted
    fn on_give_up(&self, _cause: RetryCause, _attempts: u32) {}

    /// Called when a request is sent
    fn on_request_start(&self) {}

    /// Called when a request resolves, successfully or not
    fn on_request_end(&self) {}
}

/// No-op notifier for when progress reporting is not needed
pub struct NoRetryProgress;

impl RetryNotifier for NoRetryProgress {
    fn on_retry(&self, _event: &RetryEvent) {}
}
