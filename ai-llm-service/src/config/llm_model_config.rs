use crate::config::llm_provider::LlmProvider;

/// Configuration for a model client.
///
/// # Fields
///
/// - `provider`: Which backend serves the model.
/// - `model`: Deployment name (chat) or model identifier (embeddings).
/// - `endpoint`: Base URL of the resource, e.g. `https://my-res.openai.azure.com`.
/// - `api_key`: Key sent in the `api-key` header.
/// - `api_version`: Value of the `api-version` query parameter.
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::AzureOpenAi,
///     model: "gpt-4o".to_string(),
///     endpoint: "https://my-res.openai.azure.com".to_string(),
///     api_key: Some("secret".to_string()),
///     api_version: Some("2024-06-01".to_string()),
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.model, "gpt-4o");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmModelConfig {
    /// The provider/backend.
    pub provider: LlmProvider,

    /// Deployment or model identifier.
    pub model: String,

    /// Resource base URL.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// `api-version` query parameter.
    pub api_version: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
