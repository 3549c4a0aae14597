//! Answer gateway port
//!
//! Defines the interface for the answer-generation service.

use async_trait::async_trait;
use thiserror::Error;

/// HTTP status code the service uses for a temporary outage.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Errors that can occur during answer generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Service unavailable (code {code}): {message}")]
    ServiceUnavailable { code: u16, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed (code {code}): {message}")]
    RequestFailed { code: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key")]
    MissingApiKey,
}

impl GatewayError {
    /// Build an error from a status code, classifying 503 as transient.
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == SERVICE_UNAVAILABLE {
            GatewayError::ServiceUnavailable { code, message }
        } else {
            GatewayError::RequestFailed { code, message }
        }
    }

    /// Whether the retry wrapper should back off and resend
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::ServiceUnavailable { .. })
    }
}

/// Gateway to the answer-generation service
///
/// The model identifier is adapter configuration; the application layer
/// only supplies the prompt and the system instruction. An empty string is
/// a valid (retryable) answer, not an error.
#[async_trait]
pub trait AnswerGateway: Send + Sync {
    async fn generate(&self, prompt: &str, system_instruction: &str)
    -> Result<String, GatewayError>;
}
