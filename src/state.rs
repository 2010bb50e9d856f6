//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the optional completion provider and the in-memory playground
//! (live form config, result list, in-flight flag). Nothing here outlives
//! the process.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::llm::LlmChat;
use crate::services::playground::{PlaygroundError, PlaygroundState};

// =============================================================================
// PROMPT CONFIG
// =============================================================================

/// Models selectable from the playground form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelChoice {
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "gpt-4")]
    Gpt4,
}

impl ModelChoice {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::Gpt4 => "gpt-4",
        }
    }
}

/// One full set of generation parameters. Snapshotted into every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptConfig {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: ModelChoice,
    pub temperature: f64,
    pub max_tokens: u32,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    /// Empty means unset.
    #[serde(default)]
    pub stop_sequence: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are an expert product description writer. Create compelling, detailed product \
                            descriptions that highlight key features and benefits."
                .into(),
            user_prompt: "Write a product description for: iPhone 15 Pro".into(),
            model: ModelChoice::Gpt35Turbo,
            temperature: 0.7,
            max_tokens: 150,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            stop_sequence: String::new(),
        }
    }
}

impl PromptConfig {
    pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);
    pub const PENALTY_RANGE: (f64, f64) = (0.0, 2.0);
    pub const MAX_TOKENS_RANGE: (u32, u32) = (10, 500);

    /// Check slider values against the ranges the form allows.
    ///
    /// # Errors
    ///
    /// Returns [`PlaygroundError::InvalidConfig`] naming the first field out of range.
    pub fn validate(&self) -> Result<(), PlaygroundError> {
        check_f64("temperature", self.temperature, Self::TEMPERATURE_RANGE)?;
        check_f64("presencePenalty", self.presence_penalty, Self::PENALTY_RANGE)?;
        check_f64("frequencyPenalty", self.frequency_penalty, Self::PENALTY_RANGE)?;
        let (lo, hi) = Self::MAX_TOKENS_RANGE;
        if !(lo..=hi).contains(&self.max_tokens) {
            return Err(PlaygroundError::InvalidConfig(format!("maxTokens must be between {lo} and {hi}")));
        }
        Ok(())
    }
}

fn check_f64(field: &str, value: f64, (lo, hi): (f64, f64)) -> Result<(), PlaygroundError> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(PlaygroundError::InvalidConfig(format!("{field} must be between {lo} and {hi}")))
    }
}

// =============================================================================
// TEST RESULT
// =============================================================================

/// Outcome of one generation. `output` is empty when `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: Uuid,
    pub config: PromptConfig,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339.
    pub timestamp: String,
}

impl TestResult {
    #[must_use]
    pub fn success(config: PromptConfig, output: String, timestamp: String) -> Self {
        Self { id: Uuid::new_v4(), config, output, error: None, timestamp }
    }

    #[must_use]
    pub fn failure(config: PromptConfig, error: String, timestamp: String) -> Self {
        Self { id: Uuid::new_v4(), config, output: String::new(), error: Some(error), timestamp }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Optional completion provider. `None` if the API key is not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub playground: Arc<Mutex<PlaygroundState>>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>) -> Self {
        Self { llm, playground: Arc::new(Mutex::new(PlaygroundState::new())) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
