//! Blocking client for the local chat-completion endpoint.
//!
//! One request, one response, no retries and no state between calls. The
//! endpoint speaks the OpenAI-compatible shape: a single user message in,
//! `choices[0].message.content` out.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Parameters for one generation call. Ephemeral, owned by the call site.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Failure modes of a generation call. Never retried automatically.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Connection refused, transport failure, or request timeout.
    #[error("generation request failed: {0}")]
    Network(#[source] reqwest::Error),
    /// The endpoint answered with a non-success HTTP status.
    #[error("generation endpoint returned HTTP {0}")]
    Status(u16),
    /// The response body was not the expected JSON shape.
    #[error("unexpected generation response: {0}")]
    Parse(String),
}

/// JSON request body for `/v1/chat/completions`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// JSON response body. Only the fields we consume are modeled.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Blocking wrapper around the generation endpoint.
pub struct GenerationClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl GenerationClient {
    /// Build a client with a bounded request timeout. An unresponsive
    /// endpoint fails the call the same way a refused connection does.
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GenerationError::Network)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    /// Send one prompt and return the generated text, trimmed.
    pub fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            url = %url,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            prompt_len = request.prompt.len(),
            "generation_request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(GenerationError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body = response.text().map_err(GenerationError::Network)?;
        extract_content(&body)
    }
}

/// Pull `choices[0].message.content` out of a response body.
fn extract_content(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Parse(format!("invalid JSON: {}", e)))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Parse("response contained no choices".to_string()))?;

    Ok(choice.message.content.trim().to_string())
}
