//! LLM Client — the single point of entry for all Claude API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! All model invocations MUST go through the `ModelInvoker` trait.
//!
//! One request per call. There is no retry here: a failure is surfaced to the
//! caller as-is and retry policy belongs to whoever triggered the generation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),

    #[error("Malformed response envelope: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("LLM returned no text content")]
    EmptyContent,
}

impl LlmError {
    /// True when the model answered but its envelope could not be used.
    /// Everything else is a failure to complete the invocation itself.
    pub fn is_response_format(&self) -> bool {
        matches!(self, LlmError::Decode(_) | LlmError::EmptyContent)
    }
}

/// Generation controls sent with every invocation.
///
/// Every field is mandatory; defaults live in `Config`, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub model: String,
    pub max_tokens: u32,
    /// Nucleus sampling probability mass, 0.0 – 1.0
    pub top_p: f32,
    /// Candidate pool size, ≥ 1
    pub top_k: u32,
    /// 0.0 – 1.0
    pub temperature: f32,
    pub stop_sequences: Vec<String>,
}

impl ModelParameters {
    /// Checks every numeric field against the ranges the Messages API accepts.
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::InvalidParameters(
                "model identifier is empty".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(LlmError::InvalidParameters(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(LlmError::InvalidParameters(format!(
                "top_p must be within 0.0..=1.0, got {}",
                self.top_p
            )));
        }
        if self.top_k == 0 {
            return Err(LlmError::InvalidParameters(
                "top_k must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(LlmError::InvalidParameters(format!(
                "temperature must be within 0.0..=1.0, got {}",
                self.temperature
            )));
        }
        if self.stop_sequences.iter().any(|s| s.is_empty()) {
            return Err(LlmError::InvalidParameters(
                "stop sequences must not be empty strings".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
    top_p: f32,
    top_k: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "no_stop_sequences")]
    stop_sequences: &'a [String],
}

fn no_stop_sequences(sequences: &&[String]) -> bool {
    sequences.is_empty()
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> AnthropicRequest<'a> {
    fn new(prompt: &'a str, params: &'a ModelParameters) -> Self {
        Self {
            model: &params.model,
            max_tokens: params.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
            top_p: params.top_p,
            top_k: params.top_k,
            temperature: params.temperature,
            stop_sequences: &params.stop_sequences,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Builds a single-text-block response.
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock {
                block_type: "text".to_string(),
                text: Some(text.into()),
            }],
            stop_reason: Some("end_turn".to_string()),
            usage: Usage::default(),
        }
    }

    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anything that can turn a prompt into a raw model response.
///
/// `PoemPipeline` holds an `Arc<dyn ModelInvoker>` so the hosted model can be
/// swapped for a canned one.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, prompt: &str, params: &ModelParameters)
        -> Result<LlmResponse, LlmError>;
}

/// Thin wrapper over the Anthropic Messages API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(client: Client, api_key: String, api_url: String) -> Self {
        Self {
            client,
            api_key,
            api_url,
        }
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<LlmResponse, LlmError> {
        params.validate()?;

        let request_body = AnthropicRequest::new(prompt, params);

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() == 429 {
            warn!("LLM API rate limited the request: {}", body);
            return Err(LlmError::RateLimited(error_message(body)));
        }

        if !status.is_success() {
            warn!("LLM API returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(body),
            });
        }

        let llm_response = decode_response(&body)?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}, stop_reason={:?}",
            llm_response.usage.input_tokens,
            llm_response.usage.output_tokens,
            llm_response.stop_reason
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl ModelInvoker for LlmClient {
    async fn invoke(
        &self,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<LlmResponse, LlmError> {
        self.call(prompt, params).await
    }
}

fn decode_response(body: &str) -> Result<LlmResponse, LlmError> {
    serde_json::from_str(body).map_err(LlmError::Decode)
}

/// Prefers the structured error message; falls back to the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<AnthropicError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
