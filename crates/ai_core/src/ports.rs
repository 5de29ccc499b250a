//! Port definitions for the inference engine

use async_trait::async_trait;
use domain::{ChatMessage, ConversationHistory};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// A single message sent to the chat completion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceMessage {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for InferenceMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

/// Request for chat completion
///
/// Model and sampling settings come from the engine's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Messages in provider order
    pub messages: Vec<InferenceMessage>,
}

impl InferenceRequest {
    /// Build a request from a conversation history, preserving order
    pub fn from_history(history: &ConversationHistory) -> Self {
        Self {
            messages: history.iter().map(InferenceMessage::from).collect(),
        }
    }
}

/// Response from chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Generated text, exactly as returned by the provider
    pub content: String,
    /// Model used
    pub model: String,
    /// Token usage, when reported
    pub usage: Option<TokenUsage>,
    /// Why generation stopped, when reported
    pub finish_reason: Option<String>,
    /// Latency in milliseconds
    pub latency_ms: u64,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Trait for chat completion engines
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate a single completion for the given messages
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError>;
}
