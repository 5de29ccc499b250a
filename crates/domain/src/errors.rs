//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed data URI or base64 payload
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
}
