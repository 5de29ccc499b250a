//! OpenAI Speech Provider
//!
//! Implements `SpeechToText` using OpenAI Whisper and `TextToSpeech` using OpenAI TTS.
//!
//! # Supported Audio Formats
//!
//! ## STT (Whisper)
//! - webm, mp3, wav, ogg, uploaded as multipart `file` up to 25 MB
//!
//! ## TTS
//! - mp3, wav, opus (in an ogg container)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{AudioData, AudioFormat, Transcription};

/// OpenAI TTS rejects inputs longer than this many characters
const TTS_MAX_INPUT_CHARS: usize = 4096;

/// OpenAI speech provider implementing both STT and TTS
#[derive(Clone)]
pub struct OpenAISpeechProvider {
    client: Client,
    config: SpeechConfig,
    api_key: String,
}

impl std::fmt::Debug for OpenAISpeechProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAISpeechProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenAISpeechProvider {
    /// Create a new OpenAI speech provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid
    /// or carries no API key.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let api_key = config.openai_api_key.clone().unwrap_or_default();

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Build the STT endpoint URL
    fn stt_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.openai_base_url.trim_end_matches('/')
        )
    }

    /// Build the TTS endpoint URL
    fn tts_url(&self) -> String {
        format!(
            "{}/audio/speech",
            self.config.openai_base_url.trim_end_matches('/')
        )
    }

    /// Convert AudioFormat to OpenAI TTS response format string
    const fn tts_response_format(format: AudioFormat) -> &'static str {
        match format {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg | AudioFormat::Webm => "opus",
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> SpeechError {
        if err.is_timeout() {
            SpeechError::Timeout(self.config.timeout_ms)
        } else {
            SpeechError::from(err)
        }
    }

    /// Reject audio Whisper cannot ingest before spending a request on it
    fn check_upload(&self, audio: &AudioData) -> Result<(), SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        if audio.size_bytes() > self.config.max_upload_bytes {
            return Err(SpeechError::AudioTooLarge {
                size_bytes: audio.size_bytes(),
                max_bytes: self.config.max_upload_bytes,
            });
        }

        Ok(())
    }
}

/// OpenAI Whisper transcription response
///
/// The endpoint reports failures as `{"error": {...}}`, which is checked
/// before the status code.
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

/// OpenAI TTS request body
#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

fn log_api_error(operation: &str, status: reqwest::StatusCode, detail: &ApiErrorDetail) {
    if detail.code.as_deref() == Some("rate_limit_exceeded") {
        warn!(operation, %status, "OpenAI rate limit exceeded");
    } else {
        warn!(operation, %status, code = ?detail.code, message = %detail.message, "OpenAI API error");
    }
}

#[async_trait]
impl SpeechToText for OpenAISpeechProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), format = %audio.format()))]
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        debug!("Transcribing audio with OpenAI Whisper");

        self.check_upload(&audio)?;

        let filename = audio.filename();
        let mime_type = audio.mime_type();
        let data = audio.into_data();

        let file_part = Part::bytes(data)
            .file_name(filename)
            .mime_str(mime_type)
            .map_err(|e| SpeechError::InvalidAudio(format!("Invalid MIME type: {e}")))?;

        let form = Form::new()
            .part("file", file_part)
            .text("model", self.config.stt_model.clone());

        let response = self
            .client
            .post(self.stt_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        let whisper_response = match serde_json::from_str::<WhisperResponse>(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                warn!(%status, "Transcription request failed");
                return Err(SpeechError::TranscriptionFailed(format!("HTTP {status}: {body}")));
            },
            Err(e) => {
                return Err(SpeechError::InvalidResponse(format!(
                    "Failed to parse response: {e}"
                )));
            },
        };

        if let Some(detail) = whisper_response.error {
            log_api_error("transcribe", status, &detail);
            return Err(SpeechError::TranscriptionFailed(detail.message));
        }

        if !status.is_success() {
            warn!(%status, "Transcription request failed");
            return Err(SpeechError::TranscriptionFailed(format!("HTTP {status}: {body}")));
        }

        let text = whisper_response.text.ok_or_else(|| {
            SpeechError::InvalidResponse("Transcription response has no text".to_string())
        })?;

        debug!(
            text_len = text.len(),
            language = ?whisper_response.language,
            "Transcription complete"
        );

        let mut transcription = Transcription::new(text);

        if let Some(lang) = whisper_response.language {
            transcription = transcription.with_language(lang);
        }

        if let Some(duration) = whisper_response.duration {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let duration_ms = (duration * 1000.0) as u64;
            transcription = transcription.with_duration(duration_ms);
        }

        Ok(transcription)
    }

    fn model_name(&self) -> &str {
        &self.config.stt_model
    }
}

#[async_trait]
impl TextToSpeech for OpenAISpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioData, SpeechError> {
        debug!("Synthesizing speech with OpenAI TTS");

        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let char_count = text.chars().count();
        if char_count > TTS_MAX_INPUT_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {char_count} characters exceeds {TTS_MAX_INPUT_CHARS} limit"
            )));
        }

        let format = self.config.output_format;

        let request = TtsRequest {
            model: &self.config.tts_model,
            input: text,
            voice: &self.config.default_voice,
            response_format: Self::tts_response_format(format),
            speed: if (self.config.speed - 1.0).abs() < f32::EPSILON {
                None
            } else {
                Some(self.config.speed)
            },
        };

        let response = self
            .client
            .post(self.tts_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                log_api_error("synthesize", status, &api_error.error);
                return Err(SpeechError::SynthesisFailed(api_error.error.message));
            }

            warn!(%status, "Synthesis request failed");
            return Err(SpeechError::SynthesisFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        debug!(audio_size = audio_bytes.len(), "Speech synthesis complete");

        Ok(AudioData::new(audio_bytes.to_vec(), format))
    }

    fn model_name(&self) -> &str {
        &self.config.tts_model
    }
}
