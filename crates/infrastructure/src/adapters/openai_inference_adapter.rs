//! OpenAI inference adapter - Implements InferencePort using ai_core

use ai_core::{InferenceConfig, InferenceEngine, InferenceError, InferenceRequest, OpenAIInferenceEngine};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use domain::ConversationHistory;
use tracing::{debug, instrument, warn};

/// Adapter for the OpenAI chat completions API
#[derive(Debug)]
pub struct OpenAIInferenceAdapter {
    engine: OpenAIInferenceEngine,
}

impl OpenAIInferenceAdapter {
    /// Create a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the client cannot be built, e.g.
    /// when no API key is present.
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine = OpenAIInferenceEngine::new(config).map_err(|e| match e {
            InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Inference(other.to_string()),
        })?;

        Ok(Self { engine })
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::RateLimited => ApplicationError::RateLimited,
            InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Inference(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for OpenAIInferenceAdapter {
    #[instrument(skip(self, history), fields(messages = history.len()))]
    async fn generate_with_context(
        &self,
        history: &ConversationHistory,
    ) -> Result<InferenceResult, ApplicationError> {
        let request = InferenceRequest::from_history(history);

        let response = self.engine.generate(request).await.map_err(|e| {
            warn!(error = %e, "Chat completion failed");
            Self::map_error(e)
        })?;

        debug!(
            model = %response.model,
            latency_ms = response.latency_ms,
            finish_reason = ?response.finish_reason,
            "Chat completion received"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|usage| usage.total_tokens),
            latency_ms: response.latency_ms,
        })
    }
}
