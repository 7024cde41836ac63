//! Intent mapping: should we search, and with which query?

use ai_llm_service::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::{info, instrument, warn};

use crate::{
    GroundedChat,
    api_types::IntentOutcome,
    context::ConversationContext,
    error::{GroundedChatError, Result},
    prompt::INTENT_MAPPING,
};

/// Strictly decoded answer of the intent-mapping prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntentDecision {
    pub proceed_to_retrieval: bool,
    pub improved_query: String,
}

impl IntentDecision {
    /// Decodes raw model text. No defaults: anything but the exact two-field
    /// object is [`GroundedChatError::MalformedIntentOutput`].
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw.trim()).map_err(|e| GroundedChatError::MalformedIntentOutput {
            reason: e.to_string(),
        })
    }
}

impl GroundedChat {
    /// Classifies the conversation and retrieves documents when needed.
    ///
    /// Retrieval branch: documents, empty message, augmented context.
    /// Direct branch: no documents, `message = improved_query`, context untouched.
    #[instrument(skip_all, fields(messages = messages.len()))]
    pub async fn resolve_intent(
        &self,
        messages: &[ChatMessage],
        mut context: ConversationContext,
    ) -> Result<IntentOutcome> {
        let template = self.prompts.load(INTENT_MAPPING).await?;

        let mut vars = Map::new();
        vars.insert(
            "conversation".to_string(),
            serde_json::to_value(messages).map_err(|e| GroundedChatError::TemplateRender {
                name: INTENT_MAPPING.to_string(),
                reason: e.to_string(),
            })?,
        );
        let prompt = template.render(&vars)?;

        let raw = self
            .chat
            .complete(&prompt.messages, &prompt.parameters)
            .await?;

        let decision = IntentDecision::parse(&raw).inspect_err(|e| {
            warn!(error = %e, raw_len = raw.len(), "intent mapping returned malformed output");
        })?;

        info!(
            proceed_to_retrieval = decision.proceed_to_retrieval,
            improved_query = %decision.improved_query,
            "intent mapping"
        );

        if !decision.proceed_to_retrieval {
            return Ok(IntentOutcome {
                documents: Vec::new(),
                message: decision.improved_query,
                context,
            });
        }

        let top = context.top();
        let documents = self
            .retrieve(&decision.improved_query, top, &mut context)
            .await?;

        Ok(IntentOutcome {
            documents,
            message: String::new(),
            context,
        })
    }
}
