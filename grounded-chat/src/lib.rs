//! Grounded chat pipeline with a single entry point.
//!
//! Public API: [`GroundedChat::answer`]. It asks the chat model whether the
//! conversation needs retrieval, and if so embeds the rewritten query, runs a
//! hybrid search, and answers from the retrieved documents. Otherwise the
//! model's direct reply is returned unchanged.
//!
//! Stages are also exposed individually:
//! [`GroundedChat::resolve_intent`], [`GroundedChat::retrieve`] and
//! [`GroundedChat::respond`].

mod api_types;
pub mod cfg;
mod context;
mod error;
mod intent;
pub mod prompt;
mod respond;
mod retrieve;

use std::sync::Arc;

use ai_llm_service::{ChatCompletion, ChatMessage, Embeddings};
use search_index::DocumentSearch;
use tracing::{info, instrument};

pub use api_types::{IntentOutcome, PipelineResult};
pub use context::{ConversationContext, DEFAULT_TOP, Overrides, Thought};
pub use error::{GroundedChatError, Result};
pub use intent::IntentDecision;
pub use prompt::{PromptLibrary, PromptTemplate, RenderedPrompt};
pub use retrieve::SEARCH_QUERY_THOUGHT;

/// Pipeline bound to its three providers and a prompt directory.
///
/// Build once at startup and share via `Arc`; it holds no per-request state.
#[derive(Clone)]
pub struct GroundedChat {
    chat: Arc<dyn ChatCompletion>,
    embeddings: Arc<dyn Embeddings>,
    search: Arc<dyn DocumentSearch>,
    prompts: PromptLibrary,
}

impl GroundedChat {
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        embeddings: Arc<dyn Embeddings>,
        search: Arc<dyn DocumentSearch>,
        prompts: PromptLibrary,
    ) -> Self {
        Self {
            chat,
            embeddings,
            search,
            prompts,
        }
    }

    /// Runs the whole pipeline for `messages`.
    ///
    /// A missing `context` starts a fresh one. Any stage failure aborts the
    /// run; there is no fallback answer.
    ///
    /// # Example
    /// ```no_run
    /// # use grounded_chat::{GroundedChat, PipelineResult};
    /// # use ai_llm_service::ChatMessage;
    /// # async fn run(pipeline: GroundedChat) -> grounded_chat::Result<()> {
    /// let out: PipelineResult = pipeline
    ///     .answer(&[ChatMessage::user("I need a laptop under 1000 dollars")], None)
    ///     .await?;
    /// println!("{} (grounded: {})", out.message, out.valid_query);
    /// # Ok(()) }
    /// ```
    #[instrument(skip_all, fields(messages = messages.len()))]
    pub async fn answer(
        &self,
        messages: &[ChatMessage],
        context: Option<ConversationContext>,
    ) -> Result<PipelineResult> {
        let context = context.unwrap_or_default();

        let outcome = self.resolve_intent(messages, context).await?;

        if outcome.documents.is_empty() {
            info!(valid_query = false, "answered without retrieval");
            return Ok(PipelineResult {
                message: outcome.message,
                context: outcome.context,
                valid_query: false,
            });
        }

        let message = self
            .respond(messages, &outcome.documents, &outcome.context)
            .await?;

        info!(
            valid_query = true,
            grounding = outcome.context.grounding_data.len(),
            "answered from retrieved documents"
        );
        Ok(PipelineResult {
            message,
            context: outcome.context,
            valid_query: true,
        })
    }
}
