//! LLM Client: the single point of entry for all model calls in the service.
//!
//! ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
//! All model interactions MUST go through a `ChatModel`.
//!
//! Model: gpt-4 (hardcoded, not configurable, to prevent drift)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;
#[cfg(test)]
pub mod stub;

/// The model used for all generation calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One single-turn completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// The model seam. `AppState` carries an `Arc<dyn ChatModel>` so the
/// generator never knows whether it is talking to OpenAI or a test stub.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the text of the model's reply. Implementations must map a
    /// blank reply to `LlmError::EmptyContent`.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the text content of the first choice, if it is non-blank.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Wraps the OpenAI Chat Completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    /// Makes a single call to the Chat Completions endpoint. No retries:
    /// a failed call surfaces to the caller immediately.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(&body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    fn model_name(&self) -> &str {
        MODEL
    }
}

/// Pulls `error.message` out of an OpenAI error body, falling back to the raw body.
fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<OpenAiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
