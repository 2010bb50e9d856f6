//! LLM types — chat-completion request/response types and errors.
//!
//! Provider-neutral shapes shared by the gateway and the `OpenAI` client.
//! Sampling parameters are optional so that a caller's omitted values are
//! omitted from the provider body as well.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// Human-facing message for this failure.
    ///
    /// Non-success replies prefer the provider's own `error.message`. An
    /// empty string means the failure carried no message at all.
    #[must_use]
    pub fn provider_message(&self) -> String {
        match self {
            Self::ApiResponse { status, body } => {
                if let Some(message) = error_message_from_body(body) {
                    return message;
                }
                if body.trim().is_empty() {
                    return String::new();
                }
                format!("{status} {}", body.trim())
            }
            Self::ApiRequest(msg) | Self::ApiParse(msg) if msg.trim().is_empty() => String::new(),
            other => other.to_string(),
        }
    }
}

fn error_message_from_body(body: &str) -> Option<String> {
    let root: Value = serde_json::from_str(body).ok()?;
    let error = root.get("error")?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())?;
    if message.trim().is_empty() { None } else { Some(message.to_string()) }
}

// =============================================================================
// REQUEST
// =============================================================================

/// A single message in a chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// Body of a `/chat/completions` request. Serializes to the provider wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Parsed result of a chat-completion call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Completion {
    /// Text of the first choice, `None` when absent or empty.
    pub content: Option<String>,
    pub model: String,
    pub finish_reason: Option<String>,
    /// Provider-reported token usage, passed through untouched.
    pub usage: Option<Value>,
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for chat completion. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Model used when a request does not name one.
    fn default_model(&self) -> &str;

    /// Send a completion request to the provider.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the response is malformed.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
