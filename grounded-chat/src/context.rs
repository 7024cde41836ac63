//! Request-scoped conversation context carried across pipeline stages.

use search_index::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Documents retrieved when the caller does not override `top`.
pub const DEFAULT_TOP: usize = 5;

fn default_top() -> usize {
    DEFAULT_TOP
}

/// Tunable knobs supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    /// Number of documents to retrieve.
    #[serde(default = "default_top")]
    pub top: usize,
}

impl Default for Overrides {
    fn default() -> Self {
        Self { top: DEFAULT_TOP }
    }
}

/// One audit entry describing an intermediate artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    pub title: String,
    pub description: Value,
}

/// Mutable context for a single request. Never persisted.
///
/// `thoughts` and `grounding_data` are append-only; unknown keys sent by the
/// caller are kept in `extra` and echoed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    #[serde(default)]
    pub overrides: Overrides,
    #[serde(default)]
    pub thoughts: Vec<Thought>,
    #[serde(default)]
    pub grounding_data: Vec<Document>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationContext {
    /// Retrieval count; `0` falls back to [`DEFAULT_TOP`].
    pub fn top(&self) -> usize {
        match self.overrides.top {
            0 => DEFAULT_TOP,
            n => n,
        }
    }

    pub fn push_thought(&mut self, title: impl Into<String>, description: impl Into<Value>) {
        self.thoughts.push(Thought {
            title: title.into(),
            description: description.into(),
        });
    }

    pub fn extend_grounding<I>(&mut self, docs: I)
    where
        I: IntoIterator<Item = Document>,
    {
        self.grounding_data.extend(docs);
    }
}
