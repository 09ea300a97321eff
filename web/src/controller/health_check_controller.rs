use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use super::ApiResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    environment: String,
}

/// GET report that the server is up and which runtime environment it runs in
pub async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    let health = Health {
        status: "healthy",
        environment: app_state.config.runtime_env().to_string(),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::new(StatusCode::OK.into(), health)),
    )
}
