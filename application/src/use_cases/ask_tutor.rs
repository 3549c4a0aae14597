//! Ask Tutor use case
//!
//! Sends one question to the answer-generation service, retrying empty
//! answers and transient outages within a shared attempt budget.
//!
//! ```text
//! Sending ──► Success            (non-empty text)
//!    │
//!    ├──► EmptyRetry ──► Sending (empty text, budget left, fixed delay)
//!    ├──► TransientRetry ──► Sending (503, budget left, 2^n backoff)
//!    └──► Fatal                  (budget exhausted, or any other error)
//! ```

use crate::ports::answer_gateway::{AnswerGateway, GatewayError};
use crate::ports::progress::{NoRetryProgress, RetryEvent, RetryNotifier};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use tutor_domain::{RetryCause, RetryPolicy, RetryState, RetryStep};

/// Errors that end a question/answer exchange
#[derive(Error, Debug)]
pub enum AskError {
    #[error("No response from the model after {attempts} attempt(s)")]
    EmptyResponse { attempts: u32 },

    #[error("Service still unavailable after {attempts} attempt(s): {source}")]
    Unavailable {
        attempts: u32,
        #[source]
        source: GatewayError,
    },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Use case for asking the tutor with bounded retries
pub struct AskTutorUseCase<G: AnswerGateway + 'static> {
    gateway: Arc<G>,
    policy: RetryPolicy,
}

impl<G: AnswerGateway + 'static> AskTutorUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, AskError> {
        self.execute_with_progress(prompt, system_instruction, &NoRetryProgress)
            .await
    }

    /// Execute the use case with retry callbacks
    pub async fn execute_with_progress(
        &self,
        prompt: &str,
        system_instruction: &str,
        progress: &dyn RetryNotifier,
    ) -> Result<String, AskError> {
        progress.on_request_start();
        let result = self.send_with_retry(prompt, system_instruction, progress).await;
        progress.on_request_end();
        result
    }

    async fn send_with_retry(
        &self,
        prompt: &str,
        system_instruction: &str,
        progress: &dyn RetryNotifier,
    ) -> Result<String, AskError> {
        let mut state = RetryState::new(self.policy);

        loop {
            debug!(attempt = state.attempts_used() + 1, "Sending question to tutor");

            let (cause, error) = match self.gateway.generate(prompt, system_instruction).await {
                Ok(text) if !text.is_empty() => {
                    info!(
                        retries = state.attempts_used(),
                        chars = text.len(),
                        "Tutor answered"
                    );
                    return Ok(text);
                }
                Ok(_) => {
                    warn!("No response from the model");
                    (RetryCause::EmptyResponse, None)
                }
                Err(e) if e.is_transient() => {
                    warn!("Service unavailable: {}", e);
                    (RetryCause::TransientUnavailable, Some(e))
                }
                Err(e) => {
                    warn!("Tutor request failed: {}", e);
                    return Err(AskError::Gateway(e));
                }
            };

            match state.register_failure(cause) {
                RetryStep::RetryAfter(delay) => {
                    progress.on_retry(&RetryEvent {
                        attempt: state.attempts_used(),
                        max_attempts: state.max_attempts(),
                        cause,
                        delay,
                    });
                    tokio::time::sleep(delay).await;
                }
                RetryStep::GiveUp => {
                    let attempts = state.attempts_used();
                    warn!(attempts, %cause, "Max retries reached");
                    progress.on_give_up(cause, attempts);

                    return Err(match error {
                        Some(source) => AskError::Unavailable { attempts, source },
                        None => AskError::EmptyResponse { attempts },
                    });
                }
            }
        }
    }
}
