//! GET /health: reports whether the provider clients initialised at startup.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// `200 {"status":"healthy"}`, or `503 {"status":"unhealthy","issues":[..]}`.
///
/// Providers are not called per request; only startup initialisation counts.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    if state.pipeline.is_some() {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                issues: Vec::new(),
            }),
        )
            .into_response();
    }

    let issues = if state.issues.is_empty() {
        vec!["pipeline not initialized".to_string()]
    } else {
        state.issues.clone()
    };
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthResponse {
            status: "unhealthy",
            issues,
        }),
    )
        .into_response()
}
