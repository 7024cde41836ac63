/// Represents the provider (backend) used for model inference.
///
/// - `AzureOpenAi` serves chat completions from a named deployment.
/// - `AzureAiInference` serves embeddings from the model inference endpoint.
///
/// Adding more providers can be done by extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Azure OpenAI deployment (`/openai/deployments/{name}/...`).
    AzureOpenAi,
    /// Azure AI model inference endpoint (`/embeddings`).
    AzureAiInference,
}
