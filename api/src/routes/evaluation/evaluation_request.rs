use serde::{Deserialize, Serialize};

/// Request payload for /evaluation.
#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    /// Single user message; becomes a one-message conversation.
    pub user_input: String,
}

/// Response payload for /evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub message: String,
}
