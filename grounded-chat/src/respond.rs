//! Grounded answering over retrieved documents.

use ai_llm_service::ChatMessage;
use search_index::Document;
use serde_json::Map;
use tracing::{info, instrument};

use crate::{
    GroundedChat,
    context::ConversationContext,
    error::{GroundedChatError, Result},
    prompt::GROUNDED_CHAT,
};

impl GroundedChat {
    /// Asks the chat model for an answer grounded in `documents`.
    ///
    /// The rendered template messages go first, then the conversation in its
    /// original order. The model text is returned as is.
    #[instrument(skip_all, fields(messages = messages.len(), documents = documents.len()))]
    pub async fn respond(
        &self,
        messages: &[ChatMessage],
        documents: &[Document],
        context: &ConversationContext,
    ) -> Result<String> {
        let template = self.prompts.load(GROUNDED_CHAT).await?;

        let to_value = |v: serde_json::Result<serde_json::Value>| {
            v.map_err(|e| GroundedChatError::TemplateRender {
                name: GROUNDED_CHAT.to_string(),
                reason: e.to_string(),
            })
        };
        let mut vars = Map::new();
        vars.insert("documents".into(), to_value(serde_json::to_value(documents))?);
        vars.insert("context".into(), to_value(serde_json::to_value(context))?);

        let prompt = template.render(&vars)?;

        let mut outgoing = prompt.messages;
        outgoing.extend_from_slice(messages);

        let answer = self.chat.complete(&outgoing, &prompt.parameters).await?;

        info!(answer_len = answer.len(), "grounded answer generated");
        Ok(answer)
    }
}
