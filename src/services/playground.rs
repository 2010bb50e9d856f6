//! Playground service — live form config, result history, and run gating.
//!
//! DESIGN
//! ======
//! `PlaygroundState` is the explicit form of what a browser page would keep
//! in component state: the editable config, the newest-first result list,
//! and an in-flight flag. A run is split into `begin_run` and `finish_run`
//! so the caller can drop the lock while the provider call is outstanding.
//! Only one run may be in flight at a time; a second is refused, not queued.
//!
//! Failed runs are recorded as results with an `error`, never surfaced as
//! service errors.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use crate::services::compare::{self, ResultGroup};
use crate::services::gateway::{self, GatewayError, GenerateRequest};
use crate::state::{AppState, PromptConfig, TestResult};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PlaygroundError {
    #[error("a generation is already in progress")]
    AlreadyRunning,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Default)]
pub struct PlaygroundState {
    config: PromptConfig,
    /// Newest first.
    results: Vec<TestResult>,
    running: bool,
}

impl PlaygroundState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    /// Replace the live config.
    ///
    /// # Errors
    ///
    /// Returns [`PlaygroundError::InvalidConfig`] if a slider value is out of range.
    pub fn set_config(&mut self, config: PromptConfig) -> Result<(), PlaygroundError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mark a run as in flight and snapshot the live config for it.
    ///
    /// # Errors
    ///
    /// Returns [`PlaygroundError::AlreadyRunning`] if a run has not finished yet.
    pub fn begin_run(&mut self) -> Result<PromptConfig, PlaygroundError> {
        if self.running {
            return Err(PlaygroundError::AlreadyRunning);
        }
        self.running = true;
        Ok(self.config.clone())
    }

    /// Clear the in-flight flag and prepend the run's result.
    pub fn finish_run(&mut self, result: TestResult) -> &TestResult {
        self.running = false;
        self.results.insert(0, result);
        &self.results[0]
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    #[must_use]
    pub fn groups(&self) -> Vec<ResultGroup> {
        compare::group_results(&self.results)
    }
}

/// Current time as an RFC 3339 string.
#[must_use]
pub fn now_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}

/// Turn a gateway outcome into a result for `config`.
#[must_use]
pub fn result_from_outcome(
    config: PromptConfig,
    outcome: Result<String, GatewayError>,
    timestamp: String,
) -> TestResult {
    match outcome {
        Ok(output) => TestResult::success(config, output, timestamp),
        Err(e) => TestResult::failure(config, e.to_string(), timestamp),
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Run one generation with the live config and record the result.
///
/// The provider call and the bookkeeping run on a spawned task, so a
/// dropped request cannot leave the in-flight flag set. The playground lock
/// is not held while the provider call is outstanding.
///
/// # Errors
///
/// Returns [`PlaygroundError::AlreadyRunning`] if another run is in flight.
pub async fn run(state: &AppState) -> Result<TestResult, PlaygroundError> {
    let config = state.playground.lock().await.begin_run()?;

    let task_state = state.clone();
    let snapshot = config.clone();
    let handle = tokio::spawn(async move {
        let request = GenerateRequest::from(&snapshot);
        let outcome = gateway::generate(task_state.llm.as_deref(), &request)
            .await
            .map(|resp| resp.output);
        let result = result_from_outcome(snapshot, outcome, now_timestamp());
        info!(id = %result.id, failed = result.error.is_some(), "playground run finished");
        let mut playground = task_state.playground.lock().await;
        playground.finish_run(result).clone()
    });

    match handle.await {
        Ok(result) => Ok(result),
        Err(e) => {
            warn!(error = %e, "playground run task failed");
            let result = result_from_outcome(config, Err(GatewayError::Unknown), now_timestamp());
            Ok(state.playground.lock().await.finish_run(result).clone())
        }
    }
}

#[cfg(test)]
#[path = "playground_test.rs"]
mod tests;
