//! HTTP handlers

pub mod chat;
pub mod health;
pub mod payload;
pub mod voice_chat;

use crate::error::ApiError;

/// Fallback for unsupported methods on the chat routes
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
