//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Inference/AI error
    #[error("Inference error: {0}")]
    Inference(String),

    /// An upstream service reported a failure; the message is shown as-is
    #[error("{0}")]
    Upstream(String),

    /// A pipeline stage exceeded its time budget
    #[error("{stage} timed out after {timeout_ms}ms")]
    Timeout {
        /// Stage that timed out
        stage: &'static str,
        /// Budget that was exceeded
        timeout_ms: u64,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}
