//! Provider clients and the async seams the orchestration layer depends on.

use std::{future::Future, pin::Pin};

use crate::{
    chat_types::{ChatMessage, ModelParameters},
    error_handler::AiLlmError,
};

pub mod azure_embeddings_service;
pub mod azure_openai_service;

/// Boxed, sendable future returned by provider traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Chat-completion provider.
///
/// Implementations send `messages` in order together with `parameters`
/// (forwarded verbatim) and return the generated text.
pub trait ChatCompletion: Send + Sync {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        parameters: &'a ModelParameters,
    ) -> BoxFuture<'a, Result<String, AiLlmError>>;
}

/// Embeddings provider bound to a single model identifier.
pub trait Embeddings: Send + Sync {
    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Embeds `input` and returns exactly one vector.
    fn embed<'a>(&'a self, input: &'a str) -> BoxFuture<'a, Result<Vec<f32>, AiLlmError>>;
}
