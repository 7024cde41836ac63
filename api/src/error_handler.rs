use ai_llm_service::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use grounded_chat::GroundedChatError;
use search_index::SearchIndexError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid model configuration: {0}")]
    ModelConfig(#[source] AiLlmError),

    #[error("invalid search configuration: {0}")]
    SearchConfig(#[source] SearchIndexError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// The pipeline never initialised; see `/health` for the reasons.
    #[error("service unavailable: {}", .0.join("; "))]
    ServiceUnavailable(Vec<String>),

    /// Pipeline failure mapped to a specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::ModelConfig(_) | AppError::SearchConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Bind { .. } | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Http { status, .. } => *status,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::ModelConfig(_) | AppError::SearchConfig(_) => "CONFIG_ERROR",
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Maps pipeline failures onto HTTP status & stable error codes.
impl From<GroundedChatError> for AppError {
    fn from(err: GroundedChatError) -> Self {
        let (status, code) = match &err {
            GroundedChatError::TemplateNotFound { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_NOT_FOUND")
            }
            GroundedChatError::TemplateInvalid { .. }
            | GroundedChatError::TemplateRender { .. }
            | GroundedChatError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_ERROR"),
            GroundedChatError::MalformedIntentOutput { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MALFORMED_INTENT_OUTPUT")
            }
            GroundedChatError::Llm(_) | GroundedChatError::Search(_) => {
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR")
            }
        };
        AppError::Http {
            status,
            code,
            message: err.to_string(),
        }
    }
}
