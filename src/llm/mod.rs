//! LLM — completion provider adapter for the playground gateway.
//!
//! DESIGN
//! ======
//! Configured from environment variables. `LlmClient` wraps the
//! OpenAI-compatible chat completions client and is handed to the gateway
//! as an `Arc<dyn LlmChat>`, so handlers can be exercised with a mock.

pub mod config;
pub mod openai;
pub mod types;

use config::LlmConfig;
pub use types::LlmChat;
use types::{Completion, CompletionRequest, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client backed by an OpenAI-compatible API.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = openai::OpenAiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured default model name (e.g. `"gpt-3.5-turbo"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        self.inner.chat_completions(request).await
    }
}
