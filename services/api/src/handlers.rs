//! Axum Handlers for the REST API
//!
//! Validates inbound commands and hands them to the orchestrator. Only a
//! missing or blank command is rejected here; everything else is reported
//! through the orchestrator's result.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::{
    models::{CommandResponse, ErrorResponse, ProcessCommandPayload},
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
        }
    }
}

/// Interpret and execute a natural-language command.
#[utoipa::path(
    post,
    path = "/commands",
    request_body = ProcessCommandPayload,
    responses(
        (status = 200, description = "Command processed; see `success` for the outcome", body = CommandResponse),
        (status = 400, description = "Command missing or blank", body = ErrorResponse)
    )
)]
pub async fn process_command(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProcessCommandPayload>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = payload
        .command
        .filter(|command| !command.trim().is_empty())
        .ok_or_else(|| {
            warn!("Rejected request without a command");
            ApiError::BadRequest("Command is required".to_string())
        })?;

    let result = state.orchestrator.process_command(&command).await;
    Ok(Json(result.into()))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}
