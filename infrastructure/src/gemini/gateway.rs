//! Gemini answer gateway
//!
//! Implements [`AnswerGateway`] over the Gemini REST API. Each gateway is
//! bound to one model, so the chat and review models are two instances.

use super::protocol::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use tutor_application::ports::answer_gateway::{AnswerGateway, GatewayError};

/// Default REST endpoint for the Gemini API
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Answer gateway backed by a single Gemini model
pub struct GeminiAnswerGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiAnswerGateway {
    /// Create a gateway for `model`.
    ///
    /// Fails with [`GatewayError::MissingApiKey`] when the key is blank.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GatewayError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl AnswerGateway for GeminiAnswerGateway {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, GatewayError> {
        let request = GenerateContentRequest::single_turn(prompt, system_instruction);
        debug!(model = %self.model, "POST generateContent");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            };
            warn!(
                code = status.as_u16(),
                model = %self.model,
                "Gemini request failed: {}",
                message
            );
            return Err(GatewayError::from_status(status.as_u16(), message));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn gateway(url: &str) -> GeminiAnswerGateway {
        GeminiAnswerGateway::new(url, "gemini-2.5-flash", "test-key").unwrap()
    }

    #[test]
    fn test_missing_api_key() {
        let result = GeminiAnswerGateway::new(DEFAULT_ENDPOINT, "m", "  ");
        assert!(matches!(result, Err(GatewayError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJsonString(
                r#"{"systemInstruction":{"parts":[{"text":"sys"}]}}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Hallo!"}]}}]}"#)
            .create_async()
            .await;

        let answer = gateway(&server.url()).generate("hi", "sys").await.unwrap();
        assert_eq!(answer, "Hallo!");
        mock.assert();
    }

    #[tokio::test]
    async fn test_empty_candidates_is_empty_answer() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let answer = gateway(&server.url()).generate("hi", "sys").await.unwrap();
        assert!(answer.is_empty());
    }

    #[tokio::test]
    async fn test_503_is_transient() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(503)
            .with_body(r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#)
            .create_async()
            .await;

        let err = gateway(&server.url()).generate("hi", "sys").await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(
            err,
            GatewayError::ServiceUnavailable {
                code: 503,
                message: "The model is overloaded.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_other_status_is_not_transient() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(400)
            .with_body("not json")
            .create_async()
            .await;

        let err = gateway(&server.url()).generate("hi", "sys").await.unwrap_err();
        assert!(!err.is_transient());
        assert!(matches!(err, GatewayError::RequestFailed { code: 400, .. }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let err = gateway(&server.url()).generate("hi", "sys").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }
}
