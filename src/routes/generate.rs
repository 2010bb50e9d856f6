//! Gateway route: `POST /api/openai`.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use super::{ApiError, api_error};
use crate::services::gateway::{self, GatewayError, GenerateRequest, GenerateResponse};
use crate::state::AppState;

/// `POST /api/openai` — validate and forward one generation request.
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| gateway_error(GatewayError::InvalidBody(rejection.body_text())))?;

    gateway::generate(state.llm.as_deref(), &request)
        .await
        .map(Json)
        .map_err(gateway_error)
}

pub(crate) fn gateway_error_to_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::Validation | GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        GatewayError::Configuration | GatewayError::Provider(_) | GatewayError::Unknown => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn gateway_error(err: GatewayError) -> ApiError {
    api_error(gateway_error_to_status(&err), err.to_string())
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
