//! OpenAI-compatible chat completions client.
//!
//! Talks to `{base_url}/chat/completions`. Sampling parameters are forwarded
//! as given; the reply is reduced to the first choice's text plus the raw
//! `usage` object.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::LlmTimeouts;
use super::types::{Completion, CompletionRequest, LlmError};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client with the given transport timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn chat_completions(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let text = self.send_json("/chat/completions", request).await?;
        parse_chat_completions_response(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Parse a `/chat/completions` reply. A reply without choices is not an
/// error: it yields a completion with no content.
pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<Completion, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    if !root.is_object() {
        return Err(LlmError::ApiParse("chat_completions: response is not an object".to_string()));
    }

    let model = root
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();
    let usage = root.get("usage").filter(|u| !u.is_null()).cloned();

    let choice = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first());
    let finish_reason = choice
        .and_then(|c| c.get("finish_reason"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let content = choice
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_owned);

    Ok(Completion { content, model, finish_reason, usage })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
