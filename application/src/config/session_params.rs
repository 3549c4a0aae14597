//! Session parameters: how a tutoring session talks to the model and reviews cards.
//!
//! [`SessionParams`] is built by the CLI from the merged file configuration
//! and handed to the use cases. It carries no I/O concerns.

use crate::use_cases::review_cards::DEFAULT_BATCH_SIZE;
use std::time::Duration;
use tutor_domain::{DomainError, RetryPolicy, SessionMode};

/// Default tag marking cards that are waiting for review
pub const DEFAULT_REVIEW_TAG: &str = "yomitan";

/// Parameters controlling one tutoring session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    /// Mode of the interactive session
    pub mode: SessionMode,
    /// Retry budget shared by both answer-generation models
    pub retry: RetryPolicy,
    /// Tag used when no tag is given to `check`
    pub review_tag: String,
    /// Cards per review request
    pub review_batch_size: usize,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            mode: SessionMode::default(),
            retry: RetryPolicy::default(),
            review_tag: DEFAULT_REVIEW_TAG.to_string(),
            review_batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SessionParams {
    // ==================== Builder Methods ====================

    /// Build the retry policy from raw settings; rejects a zero attempt budget.
    pub fn with_retry(
        mut self,
        max_attempts: u32,
        empty_delay_secs: u64,
        backoff_base_secs: u64,
    ) -> Result<Self, DomainError> {
        self.retry = RetryPolicy::new(
            max_attempts,
            Duration::from_secs(empty_delay_secs),
            Duration::from_secs(backoff_base_secs),
        )?;
        Ok(self)
    }

    pub fn with_review_tag(mut self, tag: impl Into<String>) -> Self {
        self.review_tag = tag.into();
        self
    }

    pub fn with_review_batch_size(mut self, size: usize) -> Self {
        self.review_batch_size = size.max(1);
        self
    }

    /// Tag to review: the explicit one if given and non-blank, else the default.
    pub fn review_tag_or_default<'a>(&'a self, tag: Option<&'a str>) -> &'a str {
        match tag.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => &self.review_tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SessionParams::default();
        assert_eq!(params.mode, SessionMode::Ask);
        assert_eq!(params.retry.max_attempts, 3);
        assert_eq!(params.review_tag, "yomitan");
        assert_eq!(params.review_batch_size, 10);
    }

    #[test]
    fn test_with_retry() {
        let params = SessionParams::default().with_retry(5, 1, 2).unwrap();
        assert_eq!(params.retry.max_attempts, 5);
        assert_eq!(params.retry.empty_delay, Duration::from_secs(1));
        assert_eq!(params.retry.backoff_base, Duration::from_secs(2));

        assert!(SessionParams::default().with_retry(0, 2, 1).is_err());
    }

    #[test]
    fn test_batch_size_floor() {
        let params = SessionParams::default().with_review_batch_size(0);
        assert_eq!(params.review_batch_size, 1);
    }

    #[test]
    fn test_review_tag_or_default() {
        let params = SessionParams::default();
        assert_eq!(params.review_tag_or_default(None), "yomitan");
        assert_eq!(params.review_tag_or_default(Some("  ")), "yomitan");
        assert_eq!(params.review_tag_or_default(Some(" b1 ")), "b1");
    }
}
