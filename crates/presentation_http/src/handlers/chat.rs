//! Text chat handler

use axum::{Json, body::Bytes, extract::State};
use tracing::{info, instrument};

use super::payload::{AssistantResponse, ChatRequest};
use crate::{
    error::{ApiError, ErrorDisclosure},
    state::AppState,
};

/// Failures on this endpoint never reveal their cause
const DISCLOSURE: ErrorDisclosure = ErrorDisclosure::Generic;

/// Handle a text chat turn
///
/// Answers the supplied history with a spoken assistant reply.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AssistantResponse>, ApiError> {
    let pipeline = state.pipeline()?;

    let request =
        ChatRequest::from_slice(&body).map_err(|e| ApiError::from_payload(&e, DISCLOSURE))?;

    let reply = pipeline
        .text_turn(&request.messages)
        .await
        .map_err(|e| ApiError::from_application(&e, DISCLOSURE))?;

    info!(
        messages = request.messages.len(),
        reply_len = reply.content.len(),
        "Text chat answered"
    );

    Ok(Json(AssistantResponse::from_reply(reply)))
}
