//! Azure OpenAI service for chat completions.
//!
//! Minimal, non-streaming client around the Azure OpenAI REST API.
//! The URL is derived from `LlmModelConfig`:
//! - POST {endpoint}/openai/deployments/{model}/chat/completions?api-version={api_version}
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::AzureOpenAi`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::{
    chat_types::{ChatMessage, ModelParameters},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
    services::{BoxFuture, ChatCompletion},
};

/// Thin client for an Azure OpenAI chat deployment.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct AzureOpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    timeout: Duration,
}

impl AzureOpenAiService {
    /// Creates a new [`AzureOpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Azure OpenAI
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::AzureOpenAi {
            return Err(
                ProviderError::new(cfg.provider, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let api_key = cfg.api_key.clone().ok_or_else(|| {
            ProviderError::new(LlmProvider::AzureOpenAi, ProviderErrorKind::MissingApiKey)
        })?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                LlmProvider::AzureOpenAi,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            header::HeaderValue::from_str(&api_key).map_err(|e| {
                ProviderError::new(
                    LlmProvider::AzureOpenAi,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = chat_url(&cfg);

        info!(
            provider = ?cfg.provider,
            deployment = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "AzureOpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            timeout,
        })
    }

    /// Performs a **non-streaming** chat completion request.
    ///
    /// `parameters` are merged into the request body unchanged; `messages`
    /// always wins over a `messages` key in the parameter set.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] / [`AiLlmError::Timeout`] for client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`AiLlmError::Provider`] with `EmptyChoices` if no choices are returned
    #[instrument(skip_all, fields(deployment = %self.cfg.model, messages = messages.len()))]
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        parameters: &ModelParameters,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = build_chat_body(messages, parameters);

        debug!(
            endpoint = %self.cfg.endpoint,
            parameters = parameters.len(),
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_send(e, self.timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                deployment = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Azure OpenAI chat/completions returned non-success status"
            );

            return Err(ProviderError::new(
                LlmProvider::AzureOpenAi,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    deployment = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat/completions response"
                );
                return Err(ProviderError::new(
                    LlmProvider::AzureOpenAi,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `choices[0].message.content`"
                    )),
                )
                .into());
            }
        };

        let content = first_content(out).ok_or_else(|| {
            ProviderError::new(LlmProvider::AzureOpenAi, ProviderErrorKind::EmptyChoices)
        })?;

        info!(
            deployment = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }
}

impl ChatCompletion for AzureOpenAiService {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        parameters: &'a ModelParameters,
    ) -> BoxFuture<'a, Result<String, AiLlmError>> {
        Box::pin(self.chat(messages, parameters))
    }
}

fn chat_url(cfg: &LlmModelConfig) -> String {
    let base = cfg.endpoint.trim().trim_end_matches('/');
    let mut url = format!("{base}/openai/deployments/{}/chat/completions", cfg.model);
    if let Some(v) = cfg.api_version.as_deref() {
        url.push_str("?api-version=");
        url.push_str(v);
    }
    url
}

/// Merges template parameters with the message list into one JSON body.
fn build_chat_body(messages: &[ChatMessage], parameters: &ModelParameters) -> Value {
    let mut body = parameters.clone();
    let list = messages
        .iter()
        .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content }))
        .collect();
    body.insert("messages".to_string(), Value::Array(list));
    Value::Object(body)
}

fn first_content(out: ChatCompletionResponse) -> Option<String> {
    out.choices.into_iter().find_map(|c| c.message.content)
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal response for `chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::AzureOpenAi,
            model: "gpt-4o".into(),
            endpoint: "https://res.openai.azure.com/".into(),
            api_key: Some("secret".into()),
            api_version: Some("2024-06-01".into()),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn url_targets_deployment_with_api_version() {
        assert_eq!(
            chat_url(&cfg()),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn body_forwards_parameters_verbatim() {
        let mut params = ModelParameters::new();
        params.insert("temperature".into(), json!(0.2));
        params.insert("response_format".into(), json!({ "type": "json_object" }));
        params.insert("messages".into(), json!("ignored"));

        let msgs = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = build_chat_body(&msgs, &params);

        assert_eq!(body["temperature"], json!(0.2));
        assert_eq!(body["response_format"], json!({ "type": "json_object" }));
        assert_eq!(
            body["messages"],
            json!([
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "hi" }
            ])
        );
    }

    #[test]
    fn first_content_skips_empty_choices() {
        let out: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "content": null } },
                { "message": { "content": "answer" } }
            ]
        }))
        .unwrap();
        assert_eq!(first_content(out).as_deref(), Some("answer"));

        let empty: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(first_content(empty).is_none());
    }

    #[test]
    fn constructor_validates_config() {
        let mut wrong = cfg();
        wrong.provider = LlmProvider::AzureAiInference;
        assert!(AzureOpenAiService::new(wrong).is_err());

        let mut no_key = cfg();
        no_key.api_key = None;
        assert!(matches!(
            AzureOpenAiService::new(no_key),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            }))
        ));

        assert!(AzureOpenAiService::new(cfg()).is_ok());
    }
}
