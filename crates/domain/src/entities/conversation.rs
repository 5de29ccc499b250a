//! Conversation history - An ordered sequence of chat messages

use serde::{Deserialize, Serialize};

use super::{ChatMessage, MessageRole};

/// Chronological message history supplied by the caller (oldest first)
///
/// The history is never mutated in place; extending it produces a new value
/// so the caller's copy stays intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    /// Create a history from an ordered list of messages
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Iterate over the messages in order
    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    /// Get the last message in the history
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Get the number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Return a new history with `message` appended
    #[must_use]
    pub fn with_message(&self, message: ChatMessage) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend_from_slice(&self.messages);
        messages.push(message);
        Self { messages }
    }

    /// Return a new history with a user message appended
    #[must_use]
    pub fn with_user_message(&self, content: impl Into<String>) -> Self {
        self.with_message(ChatMessage::new(MessageRole::User, content))
    }

    /// Consume the history and return the messages
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }
}

impl From<Vec<ChatMessage>> for ConversationHistory {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self::new(messages)
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
