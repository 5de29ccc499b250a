//! Domain entities

mod chat_message;
mod conversation;

pub use chat_message::{ChatMessage, MessageRole};
pub use conversation::ConversationHistory;
