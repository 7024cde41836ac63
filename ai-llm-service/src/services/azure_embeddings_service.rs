//! Lightweight embeddings client for the Azure AI model inference API.
//!
//! - `POST {endpoint}/embeddings?api-version={api_version}`: embeddings retrieval
//!
//! It uses the universal configuration [`LlmModelConfig`] and ensures
//! that the selected provider is [`LlmProvider::AzureAiInference`].
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::config::default_config::config_azure_embedding;
//! use ai_llm_service::services::azure_embeddings_service::AzureEmbeddingsService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = AzureEmbeddingsService::new(config_azure_embedding()?)?;
//! let vec = svc.embeddings("laptops under 1000 dollars").await?;
//! println!("Embeddings dimension = {}", vec.len());
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
    services::{BoxFuture, Embeddings},
};

/// Thin embeddings client.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with
/// a configurable timeout.
#[derive(Debug)]
pub struct AzureEmbeddingsService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_embeddings: String,
    timeout: Duration,
}

impl AzureEmbeddingsService {
    /// Creates a new [`AzureEmbeddingsService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not `AzureAiInference`
    /// - `MissingApiKey` if no key is configured
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let provider = LlmProvider::AzureAiInference;
        if cfg.provider != provider {
            return Err(ProviderError::new(cfg.provider, ProviderErrorKind::InvalidProvider).into());
        }

        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::new(provider, ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            header::HeaderValue::from_str(&api_key).map_err(|e| {
                ProviderError::new(
                    provider,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()?;

        let base = endpoint.trim_end_matches('/');
        let url_embeddings = match cfg.api_version.as_deref() {
            Some(v) => format!("{base}/embeddings?api-version={v}"),
            None => format!("{base}/embeddings"),
        };

        Ok(Self {
            client,
            cfg,
            url_embeddings,
            timeout,
        })
    }

    /// Retrieves the embedding of a single input.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] / [`AiLlmError::Timeout`] for client errors
    /// - `Decode` if the response cannot be parsed or does not hold exactly one vector
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input: [input],
        };

        debug!(input_len = input.len(), "POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_send(e, self.timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "embeddings endpoint returned non-success status"
            );

            return Err(ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `{{ data: [{{ embedding: number[] }}] }}`"
                )),
            )
        })?;

        let vector = single_vector(out)
            .map_err(|kind| ProviderError::new(self.cfg.provider, kind))?;

        debug!(
            dim = vector.len(),
            latency_ms = started.elapsed().as_millis(),
            "embeddings completed"
        );

        Ok(vector)
    }
}

impl Embeddings for AzureEmbeddingsService {
    fn model(&self) -> &str {
        &self.cfg.model
    }

    fn embed<'a>(&'a self, input: &'a str) -> BoxFuture<'a, Result<Vec<f32>, AiLlmError>> {
        Box::pin(self.embeddings(input))
    }
}

/// Enforces the one-input/one-vector contract.
fn single_vector(out: EmbeddingsResponse) -> Result<Vec<f32>, ProviderErrorKind> {
    let count = out.data.len();
    let mut items = out.data.into_iter();
    match (items.next(), count) {
        (Some(item), 1) => Ok(item.embedding),
        _ => Err(ProviderErrorKind::Decode(format!(
            "expected exactly one embedding, got {count}"
        ))),
    }
}

/* ==========================
HTTP payloads
========================== */

/// Request body for `/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

/// Response body for `/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_wraps_input_in_list() {
        let body = EmbeddingsRequest {
            model: "text-embedding-ada-002",
            input: ["laptops"],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "model": "text-embedding-ada-002", "input": ["laptops"] })
        );
    }

    #[test]
    fn exactly_one_vector_is_required() {
        let one: EmbeddingsResponse =
            serde_json::from_value(json!({ "data": [{ "embedding": [0.1, 0.2] }] })).unwrap();
        assert_eq!(single_vector(one).unwrap(), vec![0.1, 0.2]);

        let none: EmbeddingsResponse = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(single_vector(none).is_err());

        let two: EmbeddingsResponse = serde_json::from_value(
            json!({ "data": [{ "embedding": [0.1] }, { "embedding": [0.2] }] }),
        )
        .unwrap();
        assert!(single_vector(two).is_err());
    }

    #[test]
    fn url_includes_api_version() {
        let svc = AzureEmbeddingsService::new(LlmModelConfig {
            provider: LlmProvider::AzureAiInference,
            model: "text-embedding-ada-002".into(),
            endpoint: "https://res.services.ai.azure.com/models/".into(),
            api_key: Some("k".into()),
            api_version: Some("2024-05-01-preview".into()),
            timeout_secs: None,
        })
        .unwrap();
        assert_eq!(
            svc.url_embeddings,
            "https://res.services.ai.azure.com/models/embeddings?api-version=2024-05-01-preview"
        );
        assert_eq!(Embeddings::model(&svc), "text-embedding-ada-002");
    }
}
