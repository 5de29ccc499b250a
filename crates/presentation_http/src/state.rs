//! Application state shared across handlers

use std::sync::Arc;

use application::ChatPipeline;

use crate::error::ApiError;

/// Shared application state
///
/// The pipeline is absent when no OpenAI credential is configured.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Chat pipeline backed by the upstream services
    pub pipeline: Option<Arc<ChatPipeline>>,
}

impl AppState {
    /// State serving requests through the given pipeline
    #[must_use]
    pub fn new(pipeline: Option<ChatPipeline>) -> Self {
        Self {
            pipeline: pipeline.map(Arc::new),
        }
    }

    /// The pipeline, or the missing-credential error
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] when no pipeline is configured.
    pub fn pipeline(&self) -> Result<&ChatPipeline, ApiError> {
        self.pipeline.as_deref().ok_or(ApiError::MissingCredential)
    }
}
