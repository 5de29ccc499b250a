//! Voice chat handler

use application::VoiceTurnOutcome;
use axum::{Json, body::Bytes, extract::State};
use tracing::{info, instrument};

use super::payload::{AssistantResponse, ChatRequest, IgnoreResponse, VoiceChatResponse};
use crate::{
    error::{ApiError, ErrorDisclosure},
    state::AppState,
};

/// Failures on this endpoint report their own message
const DISCLOSURE: ErrorDisclosure = ErrorDisclosure::Forward;

/// Handle a voice chat turn
///
/// Transcribes `audioInput` when present, otherwise answers the last message
/// in the history. Silent input yields `{"action":"ignore"}`.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn voice_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VoiceChatResponse>, ApiError> {
    let pipeline = state.pipeline()?;

    let request =
        ChatRequest::from_slice(&body).map_err(|e| ApiError::from_payload(&e, DISCLOSURE))?;

    let outcome = pipeline
        .voice_turn(&request.messages, request.audio_input.as_deref())
        .await
        .map_err(|e| ApiError::from_application(&e, DISCLOSURE))?;

    let response = match outcome {
        VoiceTurnOutcome::Ignored => {
            info!("Silent voice input ignored");
            VoiceChatResponse::Ignore(IgnoreResponse::default())
        },
        VoiceTurnOutcome::Replied {
            reply,
            user_transcript,
        } => {
            info!(
                transcript_len = user_transcript.len(),
                reply_len = reply.content.len(),
                "Voice chat answered"
            );
            VoiceChatResponse::Reply(AssistantResponse::with_transcript(reply, user_transcript))
        },
    };

    Ok(Json(response))
}
