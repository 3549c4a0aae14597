//! Retry policy for requests to the answer-generation service.
//!
//! Two failure causes are retried:
//!
//! - **Empty response**: the service answered without text. Retried after a
//!   fixed delay.
//! - **Transient unavailable**: the service signalled a temporary outage.
//!   Retried with exponential backoff (`base * 2^attempts`).
//!
//! Both causes share one attempt budget per logical request: a request that
//! first gets an empty answer and then a 503 has used two attempts.

use crate::core::error::DomainError;
use std::fmt;
use std::time::Duration;

/// Why a request is being retried (or gave up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCause {
    EmptyResponse,
    TransientUnavailable,
}

impl fmt::Display for RetryCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryCause::EmptyResponse => write!(f, "empty response"),
            RetryCause::TransientUnavailable => write!(f, "service unavailable"),
        }
    }
}

/// Bounds and delays for retrying a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempt budget shared by both causes
    pub max_attempts: u32,
    /// Fixed delay before resending after an empty response
    pub empty_delay: Duration,
    /// Base of the exponential backoff after a transient failure
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            empty_delay: Duration::from_secs(2),
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        empty_delay: Duration,
        backoff_base: Duration,
    ) -> Result<Self, DomainError> {
        if max_attempts == 0 {
            return Err(DomainError::InvalidRetryPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            empty_delay,
            backoff_base,
        })
    }

    /// Delay before the next attempt after `attempts_used` failures of `cause`.
    pub fn delay_for(&self, cause: RetryCause, attempts_used: u32) -> Duration {
        match cause {
            RetryCause::EmptyResponse => self.empty_delay,
            RetryCause::TransientUnavailable => self
                .backoff_base
                .saturating_mul(2u32.saturating_pow(attempts_used)),
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Sleep for the given delay, then resend
    RetryAfter(Duration),
    /// Budget exhausted
    GiveUp,
}

/// Attempt bookkeeping for one logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    policy: RetryPolicy,
    attempts_used: u32,
    last_cause: Option<RetryCause>,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts_used: 0,
            last_cause: None,
        }
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn last_cause(&self) -> Option<RetryCause> {
        self.last_cause
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// Register a failed attempt and decide whether to retry.
    pub fn register_failure(&mut self, cause: RetryCause) -> RetryStep {
        self.attempts_used += 1;
        self.last_cause = Some(cause);

        if self.attempts_used < self.policy.max_attempts {
            RetryStep::RetryAfter(self.policy.delay_for(cause, self.attempts_used))
        } else {
            RetryStep::GiveUp
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.empty_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(RetryPolicy::new(0, Duration::ZERO, Duration::ZERO).is_err());
    }

    #[test]
    fn test_backoff_is_exponential_from_two() {
        let policy = RetryPolicy::default();
        let delays: Vec<_> = (1..=3)
            .map(|n| policy.delay_for(RetryCause::TransientUnavailable, n))
            .collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
    }

    #[test]
    fn test_transient_budget() {
        let mut state = RetryState::new(RetryPolicy::default());
        assert_eq!(
            state.register_failure(RetryCause::TransientUnavailable),
            RetryStep::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(
            state.register_failure(RetryCause::TransientUnavailable),
            RetryStep::RetryAfter(Duration::from_secs(4))
        );
        assert_eq!(
            state.register_failure(RetryCause::TransientUnavailable),
            RetryStep::GiveUp
        );
        assert_eq!(state.attempts_used(), 3);
    }

    #[test]
    fn test_causes_share_one_budget() {
        let mut state = RetryState::new(RetryPolicy::default());
        assert_eq!(
            state.register_failure(RetryCause::EmptyResponse),
            RetryStep::RetryAfter(Duration::from_secs(2))
        );
        // Second failure of a different cause still counts against the budget
        assert_eq!(
            state.register_failure(RetryCause::TransientUnavailable),
            RetryStep::RetryAfter(Duration::from_secs(4))
        );
        assert_eq!(
            state.register_failure(RetryCause::EmptyResponse),
            RetryStep::GiveUp
        );
        assert_eq!(state.last_cause(), Some(RetryCause::EmptyResponse));
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy::new(1, Duration::from_secs(2), Duration::from_secs(1)).unwrap();
        let mut state = RetryState::new(policy);
        assert_eq!(
            state.register_failure(RetryCause::EmptyResponse),
            RetryStep::GiveUp
        );
    }
}
