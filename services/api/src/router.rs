//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the command endpoint and OpenAPI documentation.

use crate::{
    handlers,
    models::{CommandResponse, ErrorResponse, ProcessCommandPayload},
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::process_command, handlers::health),
    components(schemas(ProcessCommandPayload, CommandResponse, ErrorResponse)),
    tags(
        (name = "Herald API", description = "Natural-language email and chat commands")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/commands", post(handlers::process_command))
        .route("/health", get(handlers::health))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
