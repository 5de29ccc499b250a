//! JSON rendering for request body limit rejections
//!
//! Both the `Content-Length` check in tower-http's `RequestBodyLimitLayer`
//! and axum's streaming limit answer 413 with a plain-text body. This maps
//! them onto the usual `{"error": "..."}` payload.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ApiError;

/// Response mapper rewriting any 413 into an [`ApiError::PayloadTooLarge`] body
pub async fn payload_too_large_as_json(response: Response) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }

    warn!("Request body exceeded the configured limit");
    ApiError::PayloadTooLarge.into_response()
}
