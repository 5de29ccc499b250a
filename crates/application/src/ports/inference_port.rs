//! Inference port - Interface for chat completion

use async_trait::async_trait;
use domain::ConversationHistory;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of an inference call
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// Generated response content, untrimmed
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Number of tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Latency in milliseconds
    pub latency_ms: u64,
}

/// Port for inference operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InferencePort: Send + Sync {
    /// Generate the next assistant message for a conversation
    async fn generate_with_context(
        &self,
        history: &ConversationHistory,
    ) -> Result<InferenceResult, ApplicationError>;
}
