//! Wiring of the chat pipeline from configuration

use std::sync::Arc;

use application::{ApplicationError, ChatPipeline};
use tracing::{info, warn};

use crate::{
    adapters::{OpenAIInferenceAdapter, SpeechAdapter},
    config::AppConfig,
};

/// Build the chat pipeline backed by the OpenAI adapters
///
/// Returns `Ok(None)` when no API key is configured, so the server can
/// still start and answer each chat request with a credential error.
///
/// # Errors
///
/// Returns an error if a client cannot be constructed from the configuration.
pub fn build_chat_pipeline(config: &AppConfig) -> Result<Option<ChatPipeline>, ApplicationError> {
    if config.api_key().is_none() {
        warn!("No OpenAI API key configured; chat endpoints will report a missing credential");
        return Ok(None);
    }

    let inference = OpenAIInferenceAdapter::new(config.inference_config())?;
    let speech = SpeechAdapter::new(config.speech_config())?;

    info!(
        model = %config.inference.default_model,
        stt_model = %config.speech.stt_model,
        tts_model = %config.speech.tts_model,
        voice = %config.speech.default_voice,
        "Chat pipeline ready"
    );

    Ok(Some(ChatPipeline::with_config(
        Arc::new(inference),
        Arc::new(speech),
        config.pipeline.to_pipeline_config(),
    )))
}
