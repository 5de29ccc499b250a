//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to connect to inference server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to inference server failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response parsed but carried no completion
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Timeout during inference
    #[error("Inference timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(60000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failed_error_message() {
        let err = InferenceError::ConnectionFailed("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn empty_response_error_message() {
        let err = InferenceError::EmptyResponse("no choices".to_string());
        assert_eq!(err.to_string(), "Empty response: no choices");
    }

    #[test]
    fn timeout_error_message() {
        let err = InferenceError::Timeout(60000);
        assert_eq!(err.to_string(), "Inference timeout after 60000ms");
    }

    #[test]
    fn server_error_message() {
        let err = InferenceError::ServerError("Status 500".to_string());
        assert_eq!(err.to_string(), "Server error: Status 500");
    }

    #[test]
    fn rate_limited_error_message() {
        assert_eq!(InferenceError::RateLimited.to_string(), "Rate limit exceeded");
    }
}
