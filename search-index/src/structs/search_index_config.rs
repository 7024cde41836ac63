//! Configuration layer: reads search index settings from environment variables.

use std::time::Duration;

use crate::errors::SearchIndexError;

pub const DEFAULT_API_VERSION: &str = "2024-07-01";
pub const DEFAULT_VECTOR_FIELD: &str = "contentVector";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connectivity and index parameters for the hosted search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIndexConfig {
    /// Service URL, e.g. `https://my-search.search.windows.net`.
    pub endpoint: String,
    /// Admin or query key, sent as `api-key`.
    pub api_key: String,
    /// Target index name.
    pub index_name: String,
    /// REST `api-version`.
    pub api_version: String,
    /// Name of the vector field queried by nearest-neighbour search.
    pub vector_field: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SearchIndexConfig {
    /// Build configuration from the process environment.
    ///
    /// Environment variables used:
    /// - `SEARCH_INDEX_ENDPOINT` (required)
    /// - `SEARCH_INDEX_KEY` (required)
    /// - `AISEARCH_INDEX_NAME` (required)
    /// - `SEARCH_API_VERSION` (default: "2024-07-01")
    /// - `SEARCH_VECTOR_FIELD` (default: "contentVector")
    /// - `SEARCH_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, SearchIndexError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`SearchIndexConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SearchIndexError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = read_required(&lookup, "SEARCH_INDEX_ENDPOINT")?;
        let api_key = read_required(&lookup, "SEARCH_INDEX_KEY")?;
        let index_name = read_required(&lookup, "AISEARCH_INDEX_NAME")?;

        let api_version = read_optional(&lookup, "SEARCH_API_VERSION")
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let vector_field = read_optional(&lookup, "SEARCH_VECTOR_FIELD")
            .unwrap_or_else(|| DEFAULT_VECTOR_FIELD.to_string());

        let timeout_secs = match read_optional(&lookup, "SEARCH_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().map_err(|_| SearchIndexError::EnvParse {
                key: "SEARCH_TIMEOUT_SECS".into(),
                value: v,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        // Basic validations
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(SearchIndexError::InvalidConfig(
                "SEARCH_INDEX_ENDPOINT must start with http:// or https://".into(),
            ));
        }
        if timeout_secs == 0 {
            return Err(SearchIndexError::InvalidConfig(
                "SEARCH_TIMEOUT_SECS must be > 0".into(),
            ));
        }

        Ok(Self {
            endpoint,
            api_key,
            index_name,
            api_version,
            vector_field,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// `POST` target for document search.
    pub fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.index_name,
            self.api_version
        )
    }
}

fn read_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_required<F>(lookup: &F, key: &str) -> Result<String, SearchIndexError>
where
    F: Fn(&str) -> Option<String>,
{
    read_optional(lookup, key).ok_or_else(|| SearchIndexError::EnvMissing { key: key.into() })
}
