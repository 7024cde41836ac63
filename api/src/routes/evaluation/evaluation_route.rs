//! POST /evaluation: one user message in, one answer out.

use std::sync::Arc;

use ai_llm_service::ChatMessage;
use axum::{Json, extract::State};
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::evaluation::evaluation_request::{EvaluationRequest, EvaluationResponse},
};

/// Handler: POST /evaluation
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/evaluation \
///   -H 'content-type: application/json' \
///   -d '{"user_input":"I need a laptop under 1000 dollars"}'
/// ```
pub async fn evaluation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EvaluationRequest>,
) -> AppResult<Json<EvaluationResponse>> {
    let pipeline = state.pipeline()?;

    let messages = [ChatMessage::user(body.user_input)];
    let out = pipeline.answer(&messages, None).await?;

    info!(valid_query = out.valid_query, "evaluation answered");
    Ok(Json(EvaluationResponse {
        message: out.message,
    }))
}
