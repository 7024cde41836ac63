//! Unified error type for the search-index crate.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by the search index client.
#[derive(Debug, Error)]
pub enum SearchIndexError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Required environment variable is missing.
    #[error("missing env variable: {key}")]
    EnvMissing { key: String },

    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Transport ───────────────────────────────────────────────────────────
    /// Client/network error from the HTTP stack.
    #[error("search transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The search call exceeded the configured timeout.
    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    /// The index returned a non-successful HTTP status.
    #[error("search HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    // ── Payloads ────────────────────────────────────────────────────────────
    /// Response body did not match the expected `{ value: [...] }` shape.
    #[error("search decode error: {0}")]
    Decode(String),
}
