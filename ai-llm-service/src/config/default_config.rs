//! Default model configs loaded strictly from environment variables.
//!
//! Two roles are wired for the grounded chat pipeline:
//!
//! - **Chat**      → Azure OpenAI deployment used for intent mapping and answers
//! - **Embedding** → Azure AI inference embeddings model
//!
//! # Environment variables
//!
//! Chat:
//! - `AZURE_OPENAI_ENDPOINT`        = resource URL (mandatory)
//! - `OPENAI_API_KEY`               = key (mandatory)
//! - `OPENAI_API_VERSION`           = api-version (mandatory)
//! - `AZURE_OPENAI_CHAT_DEPLOYMENT` = deployment name (default `gpt-4o`)
//!
//! Embedding:
//! - `EMBEDDINGS_ENDPOINT`    = inference endpoint (mandatory)
//! - `OPENAI_API_KEY`         = key (mandatory)
//! - `EMBEDDINGS_MODEL`       = model id (default `text-embedding-ada-002`)
//! - `EMBEDDINGS_API_VERSION` = api-version (default `2024-05-01-preview`)
//!
//! Common:
//! - `LLM_TIMEOUT_SECS` = optional request timeout override (u64, > 0)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, must_var, opt_nonzero_u64, process_env, validate_http_endpoint, var_or,
    },
};

/// Deployment used when `AZURE_OPENAI_CHAT_DEPLOYMENT` is not set.
pub const DEFAULT_CHAT_DEPLOYMENT: &str = "gpt-4o";
/// Embedding model used when `EMBEDDINGS_MODEL` is not set.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_EMBEDDINGS_API_VERSION: &str = "2024-05-01-preview";

/// Constructs the chat config from the process environment.
///
/// # Defaults
/// - `timeout_secs = Some(60)`
pub fn config_azure_chat() -> Result<LlmModelConfig, AiLlmError> {
    config_azure_chat_from(&process_env)
}

/// Same as [`config_azure_chat`], reading variables through `lookup`.
pub fn config_azure_chat_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = must_var(lookup, "AZURE_OPENAI_ENDPOINT")?;
    validate_http_endpoint("AZURE_OPENAI_ENDPOINT", &endpoint)?;
    let api_key = must_var(lookup, "OPENAI_API_KEY")?;
    let api_version = must_var(lookup, "OPENAI_API_VERSION")?;
    let model = var_or(lookup, "AZURE_OPENAI_CHAT_DEPLOYMENT", DEFAULT_CHAT_DEPLOYMENT);
    let timeout_secs = opt_nonzero_u64(lookup, "LLM_TIMEOUT_SECS")?.or(Some(60));

    Ok(LlmModelConfig {
        provider: LlmProvider::AzureOpenAi,
        model,
        endpoint,
        api_key: Some(api_key),
        api_version: Some(api_version),
        timeout_secs,
    })
}

/// Constructs the embedding config from the process environment.
///
/// # Defaults
/// - `model = "text-embedding-ada-002"`
/// - `timeout_secs = Some(30)`
pub fn config_azure_embedding() -> Result<LlmModelConfig, AiLlmError> {
    config_azure_embedding_from(&process_env)
}

/// Same as [`config_azure_embedding`], reading variables through `lookup`.
pub fn config_azure_embedding_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = must_var(lookup, "EMBEDDINGS_ENDPOINT")?;
    validate_http_endpoint("EMBEDDINGS_ENDPOINT", &endpoint)?;
    let api_key = must_var(lookup, "OPENAI_API_KEY")?;
    let model = var_or(lookup, "EMBEDDINGS_MODEL", DEFAULT_EMBEDDING_MODEL);
    let api_version = var_or(
        lookup,
        "EMBEDDINGS_API_VERSION",
        DEFAULT_EMBEDDINGS_API_VERSION,
    );
    let timeout_secs = opt_nonzero_u64(lookup, "LLM_TIMEOUT_SECS")?.or(Some(30));

    Ok(LlmModelConfig {
        provider: LlmProvider::AzureAiInference,
        model,
        endpoint,
        api_key: Some(api_key),
        api_version: Some(api_version),
        timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error_handler::ConfigError;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn chat_config_uses_defaults() {
        let env = env_of(&[
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
            ("OPENAI_API_KEY", "k"),
            ("OPENAI_API_VERSION", "2024-06-01"),
        ]);
        let cfg = config_azure_chat_from(&env).unwrap();
        assert_eq!(cfg.provider, LlmProvider::AzureOpenAi);
        assert_eq!(cfg.model, DEFAULT_CHAT_DEPLOYMENT);
        assert_eq!(cfg.api_version.as_deref(), Some("2024-06-01"));
        assert_eq!(cfg.timeout_secs, Some(60));
    }

    #[test]
    fn chat_config_requires_api_version() {
        let env = env_of(&[
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
            ("OPENAI_API_KEY", "k"),
        ]);
        let err = config_azure_chat_from(&env).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_VERSION"))
        ));
    }

    #[test]
    fn embedding_config_reads_overrides() {
        let env = env_of(&[
            ("EMBEDDINGS_ENDPOINT", "https://res.services.ai.azure.com/models"),
            ("OPENAI_API_KEY", "k"),
            ("EMBEDDINGS_MODEL", "text-embedding-3-small"),
            ("LLM_TIMEOUT_SECS", "12"),
        ]);
        let cfg = config_azure_embedding_from(&env).unwrap();
        assert_eq!(cfg.provider, LlmProvider::AzureAiInference);
        assert_eq!(cfg.model, "text-embedding-3-small");
        assert_eq!(cfg.api_version.as_deref(), Some(DEFAULT_EMBEDDINGS_API_VERSION));
        assert_eq!(cfg.timeout_secs, Some(12));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let chat = env_of(&[
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
            ("OPENAI_API_KEY", "k"),
            ("OPENAI_API_VERSION", "2024-06-01"),
            ("LLM_TIMEOUT_SECS", "0"),
        ]);
        assert!(matches!(
            config_azure_chat_from(&chat),
            Err(AiLlmError::Config(ConfigError::InvalidNumber {
                var: "LLM_TIMEOUT_SECS",
                ..
            }))
        ));

        let embedding = env_of(&[
            ("EMBEDDINGS_ENDPOINT", "https://res.services.ai.azure.com/models"),
            ("OPENAI_API_KEY", "k"),
            ("LLM_TIMEOUT_SECS", "0"),
        ]);
        assert!(matches!(
            config_azure_embedding_from(&embedding),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { .. }))
        ));
    }

    #[test]
    fn embedding_config_rejects_bad_scheme() {
        let env = env_of(&[
            ("EMBEDDINGS_ENDPOINT", "res.services.ai.azure.com"),
            ("OPENAI_API_KEY", "k"),
        ]);
        assert!(matches!(
            config_azure_embedding_from(&env),
            Err(AiLlmError::Config(ConfigError::InvalidFormat { .. }))
        ));
    }
}
