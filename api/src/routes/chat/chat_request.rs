use ai_llm_service::ChatMessage;
use grounded_chat::ConversationContext;
use serde::Deserialize;

/// Request payload for /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation in order, last message is the one to answer.
    pub messages: Vec<ChatMessage>,
    /// Context from a previous turn; a fresh one is created when absent.
    #[serde(default)]
    pub context: Option<ConversationContext>,
}
