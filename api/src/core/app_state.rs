use std::sync::Arc;

use ai_llm_service::{
    config::default_config::{config_azure_chat_from, config_azure_embedding_from},
    error_handler::process_env,
    services::{
        azure_embeddings_service::AzureEmbeddingsService, azure_openai_service::AzureOpenAiService,
    },
};
use grounded_chat::{GroundedChat, cfg::GroundedChatConfig};
use search_index::{AzureSearchClient, SearchIndexConfig};
use tracing::{info, warn};

use crate::error_handler::{AppError, AppResult};

/// Shared state for all HTTP handlers.
///
/// Configuration is read once at startup. A missing variable aborts startup;
/// a provider client that cannot be built leaves `pipeline` empty and is
/// reported through `issues`.
#[derive(Clone, Default)]
pub struct AppState {
    pub pipeline: Option<Arc<GroundedChat>>,
    pub issues: Vec<String>,
}

impl AppState {
    /// State with a ready pipeline.
    pub fn ready(pipeline: GroundedChat) -> Self {
        Self {
            pipeline: Some(Arc::new(pipeline)),
            issues: Vec::new(),
        }
    }

    /// State whose pipeline failed to initialise.
    pub fn degraded(issues: Vec<String>) -> Self {
        Self {
            pipeline: None,
            issues,
        }
    }

    /// The pipeline, or [`AppError::ServiceUnavailable`] listing init issues.
    pub fn pipeline(&self) -> AppResult<&GroundedChat> {
        self.pipeline
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable(self.issues.clone()))
    }

    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chat_cfg = config_azure_chat_from(lookup).map_err(AppError::ModelConfig)?;
        let embed_cfg = config_azure_embedding_from(lookup).map_err(AppError::ModelConfig)?;
        let search_cfg = SearchIndexConfig::from_lookup(lookup).map_err(AppError::SearchConfig)?;
        let prompts = GroundedChatConfig::from_lookup(lookup).prompt_library();

        let mut issues = Vec::new();

        let chat = AzureOpenAiService::new(chat_cfg)
            .map_err(|e| issues.push(format!("chat model client: {e}")))
            .ok();
        let embeddings = AzureEmbeddingsService::new(embed_cfg)
            .map_err(|e| issues.push(format!("embeddings client: {e}")))
            .ok();
        let search = AzureSearchClient::new(search_cfg)
            .map_err(|e| issues.push(format!("search client: {e}")))
            .ok();

        match (chat, embeddings, search) {
            (Some(chat), Some(embeddings), Some(search)) => {
                info!(prompts_dir = %prompts.dir().display(), "pipeline initialized");
                Ok(Self::ready(GroundedChat::new(
                    Arc::new(chat),
                    Arc::new(embeddings),
                    Arc::new(search),
                    prompts,
                )))
            }
            _ => {
                for issue in &issues {
                    warn!(%issue, "pipeline initialization failed");
                }
                Ok(Self::degraded(issues))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("AZURE_OPENAI_ENDPOINT", "https://shop.openai.azure.com"),
        ("OPENAI_API_KEY", "openai-key"),
        ("OPENAI_API_VERSION", "2024-06-01"),
        ("EMBEDDINGS_ENDPOINT", "https://shop.services.ai.azure.com/models"),
        ("SEARCH_INDEX_ENDPOINT", "https://shop.search.windows.net"),
        ("AISEARCH_INDEX_NAME", "products"),
    ];

    #[tokio::test]
    async fn complete_env_builds_pipeline() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SEARCH_INDEX_KEY", "search-key"));

        let state = AppState::from_lookup(&env_of(&pairs)).unwrap();
        assert!(state.pipeline.is_some());
        assert!(state.issues.is_empty());
    }

    #[test]
    fn missing_variable_fails_startup() {
        let err = AppState::from_lookup(&env_of(BASE)).err().unwrap();
        assert!(matches!(err, AppError::SearchConfig(_)));
    }

    #[tokio::test]
    async fn unusable_client_is_reported_as_issue() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SEARCH_INDEX_KEY", "bad\nkey"));

        let state = AppState::from_lookup(&env_of(&pairs)).unwrap();
        assert!(state.pipeline.is_none());
        assert_eq!(state.issues.len(), 1);
        assert!(state.issues[0].starts_with("search client:"));
    }
}
