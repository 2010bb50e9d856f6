//! Playground routes: live config, runs, grouped history.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Serialize;

use super::{ApiError, api_error};
use crate::services::compare::ResultGroup;
use crate::services::playground::{self, PlaygroundError};
use crate::state::{AppState, PromptConfig, TestResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundSnapshot {
    pub config: PromptConfig,
    pub results: Vec<TestResult>,
    pub is_running: bool,
}

/// `GET /api/playground` — live config, newest-first results, in-flight flag.
pub async fn get_playground(State(state): State<AppState>) -> Json<PlaygroundSnapshot> {
    let pg = state.playground.lock().await;
    Json(PlaygroundSnapshot {
        config: pg.config().clone(),
        results: pg.results().to_vec(),
        is_running: pg.is_running(),
    })
}

/// `PUT /api/playground/config` — replace the live config.
pub async fn put_config(
    State(state): State<AppState>,
    body: Result<Json<PromptConfig>, JsonRejection>,
) -> Result<Json<PromptConfig>, ApiError> {
    let Json(config) = body.map_err(|rejection| api_error(StatusCode::BAD_REQUEST, rejection.body_text()))?;

    let mut pg = state.playground.lock().await;
    pg.set_config(config).map_err(playground_error)?;
    Ok(Json(pg.config().clone()))
}

/// `POST /api/playground/run` — generate with the live config and record the result.
pub async fn run(State(state): State<AppState>) -> Result<Json<TestResult>, ApiError> {
    playground::run(&state)
        .await
        .map(Json)
        .map_err(playground_error)
}

/// `GET /api/playground/groups` — results grouped by user prompt with comparisons.
pub async fn groups(State(state): State<AppState>) -> Json<Vec<ResultGroup>> {
    Json(state.playground.lock().await.groups())
}

/// `DELETE /api/playground/results` — discard all results.
pub async fn clear_results(State(state): State<AppState>) -> StatusCode {
    state.playground.lock().await.clear();
    StatusCode::NO_CONTENT
}

pub(crate) fn playground_error_to_status(err: &PlaygroundError) -> StatusCode {
    match err {
        PlaygroundError::AlreadyRunning => StatusCode::CONFLICT,
        PlaygroundError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
    }
}

fn playground_error(err: PlaygroundError) -> ApiError {
    api_error(playground_error_to_status(&err), err.to_string())
}

#[cfg(test)]
#[path = "playground_test.rs"]
mod tests;
