//! In-process fakes for the three providers.

use std::{collections::VecDeque, sync::Mutex};

use ai_llm_service::{AiLlmError, BoxFuture, ChatCompletion, ChatMessage, Embeddings, ModelParameters};
use grounded_chat::{GroundedChat, PromptLibrary};
use search_index::{DocumentSearch, HybridQuery, RawSearchHit, SearchFuture};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct ScriptedChat {
    replies: Mutex<VecDeque<String>>,
}

impl ChatCompletion for ScriptedChat {
    fn complete<'a>(
        &'a self,
        _messages: &'a [ChatMessage],
        _parameters: &'a ModelParameters,
    ) -> BoxFuture<'a, Result<String, AiLlmError>> {
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or_default();
        Box::pin(async move { Ok(reply) })
    }
}

pub struct ConstantEmbeddings;

impl Embeddings for ConstantEmbeddings {
    fn model(&self) -> &str {
        "text-embedding-ada-002"
    }

    fn embed<'a>(&'a self, _input: &'a str) -> BoxFuture<'a, Result<Vec<f32>, AiLlmError>> {
        Box::pin(async { Ok(vec![0.1, 0.2, 0.3]) })
    }
}

pub struct StaticSearch(Vec<RawSearchHit>);

impl DocumentSearch for StaticSearch {
    fn vector_field(&self) -> &str {
        "contentVector"
    }

    fn search<'a>(&'a self, _query: &'a HybridQuery) -> SearchFuture<'a> {
        let hits = self.0.clone();
        Box::pin(async move { Ok(hits) })
    }
}

pub fn laptop_hits() -> Value {
    json!([
        { "id": "doc-7", "content": "TrailBook 14: $899", "filepath": "catalog/laptops.pdf", "page_number": 4 },
        { "id": "doc-2", "content": "ZenBook Air: $749", "filepath": "catalog/laptops.pdf", "page_number": 9 }
    ])
}

/// Pipeline answering with `replies` in order over `hits`.
pub fn pipeline(replies: &[&str], hits: Value) -> GroundedChat {
    let hits = hits
        .as_array()
        .map(|a| a.iter().filter_map(|h| h.as_object().cloned()).collect())
        .unwrap_or_default();
    GroundedChat::new(
        Arc::new(ScriptedChat {
            replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
        }),
        Arc::new(ConstantEmbeddings),
        Arc::new(StaticSearch(hits)),
        PromptLibrary::bundled(),
    )
}
