//! REST client for Azure AI Search document queries.

use std::time::Instant;

use reqwest::header;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::{
    DocumentSearch, SearchFuture,
    errors::SearchIndexError,
    structs::{
        document::RawSearchHit, hybrid_query::HybridQuery, search_index_config::SearchIndexConfig,
    },
};

/// Client bound to one index. Build once at startup and share via `Arc`.
#[derive(Debug, Clone)]
pub struct AzureSearchClient {
    http: reqwest::Client,
    cfg: SearchIndexConfig,
    url_search: String,
}

impl AzureSearchClient {
    /// Builds the HTTP client with the `api-key` header and the configured timeout.
    pub fn new(cfg: SearchIndexConfig) -> Result<Self, SearchIndexError> {
        let mut headers = header::HeaderMap::new();
        let key = header::HeaderValue::from_str(&cfg.api_key)
            .map_err(|e| SearchIndexError::InvalidConfig(format!("invalid SEARCH_INDEX_KEY: {e}")))?;
        headers.insert("api-key", key);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .default_headers(headers)
            .build()?;

        let url_search = cfg.search_url();

        info!(
            target: "search_index::client",
            endpoint = %cfg.endpoint,
            index = %cfg.index_name,
            vector_field = %cfg.vector_field,
            "AzureSearchClient initialized"
        );

        Ok(Self {
            http,
            cfg,
            url_search,
        })
    }

    /// Runs one search request and returns the raw hits in ranking order.
    pub async fn search_raw(&self, query: &HybridQuery) -> Result<Vec<RawSearchHit>, SearchIndexError> {
        let started = Instant::now();
        debug!(
            target: "search_index::client",
            top = query.top,
            vector_queries = query.vector_queries.len(),
            has_text = query.search_text.is_some(),
            "POST {}", self.url_search
        );

        let resp = self
            .http
            .post(&self.url_search)
            .json(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchIndexError::Timeout(self.cfg.timeout)
                } else {
                    SearchIndexError::Transport(e)
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = text.chars().take(240).collect::<String>();
            error!(
                target: "search_index::client",
                %status,
                url = %self.url_search,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "search returned non-success status"
            );
            return Err(SearchIndexError::HttpStatus {
                status,
                url: self.url_search.clone(),
                snippet,
            });
        }

        let out: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SearchIndexError::Decode(format!("{e}; expected `{{ value: [...] }}`")))?;

        info!(
            target: "search_index::client",
            hits = out.value.len(),
            latency_ms = started.elapsed().as_millis(),
            "search completed"
        );

        Ok(out.value)
    }
}

impl DocumentSearch for AzureSearchClient {
    fn vector_field(&self) -> &str {
        &self.cfg.vector_field
    }

    fn search<'a>(&'a self, query: &'a HybridQuery) -> SearchFuture<'a> {
        Box::pin(self.search_raw(query))
    }
}

/// Response body of `docs/search`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    value: Vec<RawSearchHit>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn cfg(key: &str) -> SearchIndexConfig {
        SearchIndexConfig {
            endpoint: "https://shop.search.windows.net".into(),
            api_key: key.into(),
            index_name: "products".into(),
            api_version: "2024-07-01".into(),
            vector_field: "contentVector".into(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn response_keeps_ranking_order() {
        let out: SearchResponse = serde_json::from_value(json!({
            "@odata.context": "ignored",
            "value": [
                { "@search.score": 0.9, "id": "first" },
                { "@search.score": 0.8, "id": "second" }
            ]
        }))
        .unwrap();
        let ids: Vec<_> = out.value.iter().map(|h| h["id"].clone()).collect();
        assert_eq!(ids, vec![json!("first"), json!("second")]);
    }

    #[test]
    fn client_exposes_vector_field() {
        let client = AzureSearchClient::new(cfg("key")).unwrap();
        assert_eq!(client.vector_field(), "contentVector");
        assert_eq!(
            client.url_search,
            "https://shop.search.windows.net/indexes/products/docs/search?api-version=2024-07-01"
        );
    }

    #[test]
    fn rejects_non_header_safe_key() {
        assert!(matches!(
            AzureSearchClient::new(cfg("bad\nkey")),
            Err(SearchIndexError::InvalidConfig(_))
        ));
    }
}
