//! HTTP client for OpenAI-compatible chat-completion APIs
//!
//! This module provides the production `CompletionModel`: it posts a single
//! user message with `stream: true` and hands the event-stream body to the
//! SSE decoder. Together's API is the default endpoint.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::Serialize;
use tracing::{debug, error, instrument};

use super::error::LlmError;
use super::streaming::sse_fragments;
use super::{CompletionModel, FragmentStream};

/// Default base URL for the completion API
pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo";

/// Default timeout for completion requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the chat-completion client
#[derive(Debug, Clone)]
pub struct ChatCompletionConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Request timeout
    pub timeout: Duration,
}

impl ChatCompletionConfig {
    /// Configuration with default endpoint and model for the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Streaming chat-completion client
#[derive(Clone)]
pub struct ChatCompletionClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Endpoint, key and model
    config: ChatCompletionConfig,
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionClient {
    /// Create a new client
    pub fn new(config: ChatCompletionConfig) -> Result<Self, LlmError> {
        let client = ReqwestClient::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// The model identifier requests are sent for
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionModel for ChatCompletionClient {
    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_len = prompt.len()), level = "debug")]
    async fn stream_completion(&self, prompt: &str) -> Result<FragmentStream, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: true,
        };

        debug!("Sending streaming completion request");
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("API error: {} - {}", status, message);
            if status == StatusCode::UNAUTHORIZED {
                return Err(LlmError::Api {
                    status_code: status.as_u16(),
                    message: "Invalid API key or credentials".to_string(),
                });
            }
            return Err(LlmError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(sse_fragments(response.bytes_stream()).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelOutput, complete};
    use mockito::{Matcher, Server};

    const SSE_BODY: &str = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Score: 8\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"1\\nExplanation: Solid.\"}}]}\n\n",
        "data: [DONE]\n\n",
    );

    fn client_for(server: &Server) -> ChatCompletionClient {
        let config = ChatCompletionConfig::new("test-key")
            .with_base_url(server.url())
            .with_model("test-model");
        ChatCompletionClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_streamed_completion() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "test-model",
                "stream": true,
                "messages": [{ "role": "user", "content": "Rate example.com" }],
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(SSE_BODY)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let output = complete(&client, "Rate example.com").await.unwrap();

        assert_eq!(output, ModelOutput::Text("Score: 81\nExplanation: Solid.".to_string()));

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_stream_is_no_response() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body("data: [DONE]\n\n")
            .create_async()
            .await;

        let client = client_for(&server);
        let output = complete(&client, "anything").await.unwrap();

        assert_eq!(output, ModelOutput::NoResponse);

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.stream_completion("anything").await;

        match result {
            Err(LlmError::Api {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "upstream exploded");
            }
            Err(other) => panic!("expected API error, got {:?}", other),
            Ok(_) => panic!("expected API error, got a stream"),
        }

        mock_server.assert_async().await;
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let config = ChatCompletionConfig::new("k").with_base_url("http://localhost:1234/v1/");
        let client = ChatCompletionClient::new(config).unwrap();

        assert_eq!(client.completions_url(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }
}
