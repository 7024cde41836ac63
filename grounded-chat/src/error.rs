//! Typed error for the grounded-chat crate.

use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use search_index::SearchIndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroundedChatError {
    /// A required prompt template file does not exist.
    #[error("prompt template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// The template file exists but its front matter or layout is broken.
    #[error("invalid prompt template `{name}`: {reason}")]
    TemplateInvalid { name: String, reason: String },

    /// Rendering failed (bad handlebars syntax or a missing declared input).
    #[error("failed to render prompt template `{name}`: {reason}")]
    TemplateRender { name: String, reason: String },

    /// The intent-mapping answer was not `{proceed_to_retrieval, improved_query}`.
    #[error("malformed intent output: {reason}")]
    MalformedIntentOutput { reason: String },

    /// Chat-completion or embeddings provider failure.
    #[error("LLM provider error: {0}")]
    Llm(#[from] AiLlmError),

    /// Search provider failure.
    #[error("search provider error: {0}")]
    Search(#[from] SearchIndexError),

    /// Template file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GroundedChatError>;
