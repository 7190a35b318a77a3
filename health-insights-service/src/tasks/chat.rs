use tracing::info;

use crate::llm::{GenerationParams, LlmError, LlmGateway};
use crate::models::{ChatMessage, Role};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly and knowledgeable health assistant. \
Answer questions about health, wellness, nutrition, sleep and medical reports in clear, simple language. \
You are not a doctor: do not give diagnoses, and recommend consulting a healthcare professional \
for anything urgent or specific to the user's treatment.";

/// Prepend the default system message unless the conversation already starts with one.
pub fn ensure_system_prompt(mut messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let starts_with_system = messages
        .first()
        .is_some_and(|message| message.role == Role::System);
    if !starts_with_system {
        messages.insert(0, ChatMessage::system(DEFAULT_SYSTEM_PROMPT));
    }
    messages
}

pub async fn respond(
    gateway: &dyn LlmGateway,
    params: &GenerationParams,
    messages: Vec<ChatMessage>,
) -> Result<String, LlmError> {
    let history = ensure_system_prompt(messages);
    info!(messages = history.len(), "Sending chat conversation");
    gateway.complete(&history, params).await
}
