//! Gemini API client
//!
//! Direct HTTP client for the `generateContent` endpoint. One call per chat
//! turn; no retries, no timeout beyond the transport defaults.

use async_trait::async_trait;

use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::gemini::types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};

/// Something that can turn a conversation into the next reply
///
/// `Ok(None)` means the exchange succeeded but produced no usable text
/// (blocked by a safety filter, empty candidate list...).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Run one generation request
    async fn generate(&self, request: &GenerateContentRequest)
        -> Result<Option<String>, ChatError>;
}

/// HTTP client for the Generative Language API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    /// Create a client for the endpoint and key in `config`
    pub fn new(http: reqwest::Client, config: &ChatConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: config.model_endpoint(),
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    /// Call the API with a fully built request
    ///
    /// # Errors
    /// * `ChatError::EmptyApiKey` if no key is configured (nothing is sent)
    /// * `ChatError::Transport` if the HTTP exchange fails
    /// * `ChatError::Api` for non-2xx statuses, carrying `error.message`
    /// * `ChatError::InvalidResponse` if a 2xx body is not valid JSON
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Option<String>, ChatError> {
        if self.api_key.is_empty() {
            return Err(ChatError::EmptyApiKey);
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            turns = request.contents.len(),
            "Calling Gemini API"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response.text().await.unwrap_or_default();
            let message = ApiErrorBody::message_from(&error_body);

            tracing::error!(
                status_code = status_code,
                error_message = %message,
                "Gemini API returned error status"
            );

            return Err(ChatError::Api {
                status: status_code,
                message,
            });
        }

        let response_body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_body).map_err(|e| {
                ChatError::InvalidResponse(format!(
                    "Failed to parse JSON response from Gemini API: {}",
                    e
                ))
            })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            tracing::warn!(block_reason = %reason, "Gemini API blocked the prompt");
        }

        let text = parsed.first_text().map(str::to_string);
        match &text {
            Some(t) => tracing::debug!(response_len = t.len(), "Received reply from Gemini API"),
            None => tracing::warn!("Gemini API response contained no candidate text"),
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatVariant;
    use crate::gemini::types::{Content, SafetySetting, SystemInstruction, TurnRole};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use serial_test::serial;

    const PATH: &str = "/models/gemini-1.5-flash:generateContent";

    fn client_for(server_url: &str, api_key: &str) -> GeminiClient {
        let mut config = ChatConfig::for_variant(ChatVariant::Tutor, api_key);
        config.api_base_url = server_url.to_string();
        GeminiClient::new(reqwest::Client::new(), &config)
    }

    fn request(text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(TurnRole::User, text)],
            generation_config: Default::default(),
            safety_settings: SafetySetting::block_medium_and_above(),
            system_instruction: SystemInstruction::new("system"),
        }
    }

    fn key_matcher() -> Matcher {
        Matcher::AllOf(vec![Matcher::UrlEncoded("key".into(), "test-key".into())])
    }

    #[tokio::test]
    async fn test_generate_empty_api_key() {
        let client = client_for("http://127.0.0.1:9", "");
        let result = client.generate(&request("hi")).await;
        assert!(matches!(result, Err(ChatError::EmptyApiKey)));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(key_matcher())
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "systemInstruction": {"parts": [{"text": "system"}]},
                "generationConfig": {"temperature": 0.7, "topK": 40, "topP": 0.95}
            })))
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{"text": "This is a test response"}],
                            "role": "model"
                        },
                        "finishReason": "STOP"
                    }]
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate(&request("hi")).await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), Some("This is a test response".to_string()));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_empty_candidates_is_not_an_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(key_matcher())
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate(&request("hi")).await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_blocked_prompt_yields_no_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(key_matcher())
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate(&request("hi")).await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_server_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(key_matcher())
            .with_status(500)
            .with_body(r#"{"error": {"message": "boom"}}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let err = client.generate(&request("hi")).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "API Error: 500 - boom");
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_error_without_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(key_matcher())
            .with_status(429)
            .with_body("Too Many Requests")
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let err = client.generate(&request("hi")).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.to_string(), "API Error: 429 - Unknown error");
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(key_matcher())
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let err = client.generate(&request("hi")).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ChatError::InvalidResponse(_)));
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[tokio::test]
    async fn test_generate_connection_refused() {
        // Port 9 (discard) is not expected to accept connections
        let client = client_for("http://127.0.0.1:9", "test-key");
        let err = client.generate(&request("hi")).await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_api_key() {
        let client = client_for("http://127.0.0.1:9", "test-key");
        let err = client.generate(&request("hi")).await.unwrap_err();

        let text = err.to_string();
        assert!(!text.contains("test-key"), "key leaked: {}", text);
        assert!(!format!("{:?}", err).contains("test-key"));
    }
}
