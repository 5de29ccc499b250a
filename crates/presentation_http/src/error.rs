//! API error handling
//!
//! Every failure becomes a JSON body `{"error": "..."}`. How much of the
//! underlying cause reaches the client is decided per endpoint by an
//! [`ErrorDisclosure`] policy; the full cause is always logged.

use application::ApplicationError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Message returned when a failure's details are withheld
pub const GENERIC_FAILURE_MESSAGE: &str = "Error processing request";

/// How much of a failure's cause is shown to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisclosure {
    /// Replace the cause with [`GENERIC_FAILURE_MESSAGE`]
    Generic,
    /// Show the cause's own message
    Forward,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing API Key")]
    MissingCredential,

    #[error("Request body too large")]
    PayloadTooLarge,

    /// Any failure while handling an accepted request; carries the client-facing message
    #[error("{0}")]
    Processing(String),
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl ApiError {
    /// Convert a pipeline failure, logging the full cause
    pub fn from_application(err: &ApplicationError, disclosure: ErrorDisclosure) -> Self {
        error!(error = %err, ?disclosure, "Error processing request");
        Self::disclose(err.to_string(), disclosure)
    }

    /// Convert a request body that could not be parsed, logging the full cause
    pub fn from_payload(err: &serde_json::Error, disclosure: ErrorDisclosure) -> Self {
        error!(error = %err, ?disclosure, "Malformed request body");
        Self::disclose(err.to_string(), disclosure)
    }

    fn disclose(cause: String, disclosure: ErrorDisclosure) -> Self {
        match disclosure {
            ErrorDisclosure::Generic => Self::Processing(GENERIC_FAILURE_MESSAGE.to_string()),
            ErrorDisclosure::Forward => Self::Processing(cause),
        }
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingCredential | Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        let mut response = (status, body).into_response();
        if matches!(self, Self::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}
