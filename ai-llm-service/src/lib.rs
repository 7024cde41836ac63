//! Shared LLM service for the grounded chat backend.
//!
//! - [`services::azure_openai_service::AzureOpenAiService`]: chat completions
//!   against an Azure OpenAI deployment.
//! - [`services::azure_embeddings_service::AzureEmbeddingsService`]: single
//!   vector embeddings via the Azure AI inference API.
//! - [`services::ChatCompletion`] / [`services::Embeddings`]: provider seams
//!   used by the orchestration layer, so tests can plug in fakes.
//!
//! Construct the services once at startup, wrap them in `Arc`, and pass clones
//! to dependents.

pub mod chat_types;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use chat_types::{ChatMessage, ChatRole, ModelParameters};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use services::{BoxFuture, ChatCompletion, Embeddings};
