//! Public result types re-used by the HTTP layer.

use search_index::Document;
use serde::{Deserialize, Serialize};

use crate::context::ConversationContext;

/// Outcome of [`crate::GroundedChat::resolve_intent`].
///
/// Either `documents` is non-empty and `message` is empty (retrieval ran), or
/// `documents` is empty and `message` holds the direct reply.
#[derive(Debug, Clone)]
pub struct IntentOutcome {
    pub documents: Vec<Document>,
    pub message: String,
    pub context: ConversationContext,
}

/// Final answer of one pipeline run.
///
/// `valid_query` is `false` exactly when retrieval was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub message: String,
    pub context: ConversationContext,
    pub valid_query: bool,
}
