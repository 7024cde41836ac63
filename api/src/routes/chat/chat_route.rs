//! POST /chat: full conversation with context round-trip.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use grounded_chat::PipelineResult;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::ChatRequest,
};

/// Handler: POST /chat
///
/// Returns the pipeline result as is: `{message, context, valid_query}`.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<PipelineResult>> {
    if body.messages.is_empty() {
        return Err(AppError::Http {
            status: StatusCode::BAD_REQUEST,
            code: "BAD_REQUEST",
            message: "`messages` must contain at least one message".into(),
        });
    }

    let pipeline = state.pipeline()?;
    let out = pipeline.answer(&body.messages, body.context).await?;
    Ok(Json(out))
}
