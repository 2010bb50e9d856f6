//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the stateless gateway endpoint (`/api/openai`) and the playground
//! endpoints under a single Axum router. Every failure body has the shape
//! `{ "error": "<message>" }`.

pub mod generate;
pub mod playground;

use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Uniform JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: message.into() }))
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/openai", post(generate::generate))
        .route("/api/playground", get(playground::get_playground))
        .route("/api/playground/config", put(playground::put_config))
        .route("/api/playground/run", post(playground::run))
        .route("/api/playground/groups", get(playground::groups))
        .route("/api/playground/results", delete(playground::clear_results))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
