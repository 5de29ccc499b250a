//! Speech adapter - Implements SpeechPort using ai_speech crate

use std::sync::Arc;

use ai_speech::{
    AudioData, OpenAISpeechProvider, SpeechConfig, SpeechError, SpeechToText, TextToSpeech,
};
use application::error::ApplicationError;
use application::ports::{AudioUpload, SpeechPort, SynthesisResult, TranscriptionResult};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Message reported to clients when speech synthesis fails
pub const SYNTHESIS_FAILURE_MESSAGE: &str = "TTS API Error";

/// Adapter for speech services using ai_speech crate
#[derive(Clone)]
pub struct SpeechAdapter {
    provider: Arc<OpenAISpeechProvider>,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("stt_model", &SpeechToText::model_name(&*self.provider))
            .field("tts_model", &TextToSpeech::model_name(&*self.provider))
            .finish()
    }
}

impl SpeechAdapter {
    /// Create a new speech adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to initialize.
    pub fn new(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let provider = OpenAISpeechProvider::new(config)
            .map_err(|e: SpeechError| ApplicationError::Configuration(e.to_string()))?;

        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    /// Transcription failures carry the service's message through to the client
    fn map_transcription_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            other => ApplicationError::Upstream(other.to_string()),
        }
    }

    /// Synthesis failures collapse to a fixed message; details stay in the log
    fn map_synthesis_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            SpeechError::SynthesisFailed(detail) => {
                warn!(detail = %detail, "Speech synthesis rejected");
                ApplicationError::Upstream(SYNTHESIS_FAILURE_MESSAGE.to_string())
            },
            other => ApplicationError::Upstream(other.to_string()),
        }
    }
}

#[async_trait]
impl SpeechPort for SpeechAdapter {
    #[instrument(skip(self, upload), fields(size_bytes = upload.data.len(), format = %upload.format))]
    async fn transcribe(&self, upload: AudioUpload) -> Result<TranscriptionResult, ApplicationError> {
        let audio = AudioData::new(upload.data, upload.format).with_filename(upload.filename);

        let transcription = self
            .provider
            .transcribe(audio)
            .await
            .map_err(Self::map_transcription_error)?;

        debug!(
            text_len = transcription.text.len(),
            language = ?transcription.language,
            "Transcription complete"
        );

        Ok(TranscriptionResult {
            text: transcription.text,
            detected_language: transcription.language,
            duration_ms: transcription.duration_ms,
        })
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<SynthesisResult, ApplicationError> {
        let audio = self
            .provider
            .synthesize(text)
            .await
            .map_err(Self::map_synthesis_error)?;

        let format = audio.format();
        debug!(size_bytes = audio.size_bytes(), format = %format, "Synthesis complete");

        Ok(SynthesisResult {
            audio_data: audio.into_data(),
            format,
        })
    }
}
