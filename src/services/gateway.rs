//! Gateway service — validate a generation request and forward it to the provider.
//!
//! DESIGN
//! ======
//! The gateway is stateless. It checks the two required prompts, checks that
//! a provider is configured, builds a system + user exchange and forwards
//! the sampling parameters as given. Every failure becomes a `GatewayError`
//! whose message is shown to the caller; nothing is retried.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::llm::LlmChat;
use crate::llm::types::{ChatMessage, CompletionRequest, LlmError};
use crate::state::PromptConfig;

pub const NO_RESPONSE_FALLBACK: &str = "No response generated";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("System prompt and user prompt are required")]
    Validation,
    #[error("{0}")]
    InvalidBody(String),
    #[error("OpenAI API key is not configured")]
    Configuration,
    #[error("{0}")]
    Provider(String),
    #[error("An unknown error occurred")]
    Unknown,
}

impl From<LlmError> for GatewayError {
    fn from(err: LlmError) -> Self {
        let message = err.provider_message();
        if message.trim().is_empty() { Self::Unknown } else { Self::Provider(message) }
    }
}

/// Incoming generation request. Every field is optional on the wire; absent
/// sampling parameters are not forwarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub stop_sequence: Option<String>,
}

impl From<&PromptConfig> for GenerateRequest {
    fn from(config: &PromptConfig) -> Self {
        Self {
            system_prompt: Some(config.system_prompt.clone()),
            user_prompt: Some(config.user_prompt.clone()),
            model: Some(config.model.as_str().to_string()),
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
            presence_penalty: Some(config.presence_penalty),
            frequency_penalty: Some(config.frequency_penalty),
            stop_sequence: Some(config.stop_sequence.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateResponse {
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Validate `request`, forward it to `llm`, and shape the reply.
///
/// # Errors
///
/// - [`GatewayError::Validation`] if either prompt is missing or empty
/// - [`GatewayError::Configuration`] if no provider is configured
/// - [`GatewayError::Provider`] / [`GatewayError::Unknown`] if the provider call fails
pub async fn generate(llm: Option<&dyn LlmChat>, request: &GenerateRequest) -> Result<GenerateResponse, GatewayError> {
    let (system, user) = required_prompts(request)?;
    let llm = llm.ok_or(GatewayError::Configuration)?;

    let completion_request = build_completion_request(request, system, user, llm.default_model());
    let completion = llm.complete(&completion_request).await.map_err(|e| {
        warn!(error = %e, model = %completion_request.model, "completion request failed");
        GatewayError::from(e)
    })?;

    info!(model = %completion_request.model, finish_reason = ?completion.finish_reason, "completion succeeded");
    Ok(GenerateResponse {
        output: completion
            .content
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string()),
        usage: completion.usage,
    })
}

fn required_prompts(request: &GenerateRequest) -> Result<(&str, &str), GatewayError> {
    match (request.system_prompt.as_deref(), request.user_prompt.as_deref()) {
        (Some(system), Some(user)) if !system.is_empty() && !user.is_empty() => Ok((system, user)),
        _ => Err(GatewayError::Validation),
    }
}

/// Build the provider request. The stop array carries the trimmed stop
/// sequence and is omitted when that trims to nothing.
pub(crate) fn build_completion_request(
    request: &GenerateRequest,
    system: &str,
    user: &str,
    default_model: &str,
) -> CompletionRequest {
    let stop = request
        .stop_sequence
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| vec![s.to_string()]);

    CompletionRequest {
        model: request
            .model
            .clone()
            .unwrap_or_else(|| default_model.to_string()),
        messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        presence_penalty: request.presence_penalty,
        frequency_penalty: request.frequency_penalty,
        stop,
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
