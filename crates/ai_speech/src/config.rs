//! Configuration for speech processing

use serde::{Deserialize, Serialize};

use crate::types::AudioFormat;

/// Whisper rejects uploads larger than 25 MB
const WHISPER_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Configuration for speech processing services
#[derive(Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// OpenAI API key, injected from the application credential
    #[serde(skip)]
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL (for custom endpoints)
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Speech-to-text model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Text-to-speech model
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Default voice for TTS
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Output audio format for TTS
    #[serde(default = "default_output_format")]
    pub output_format: AudioFormat,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Largest audio upload accepted for transcription
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// TTS speaking speed (0.25 to 4.0)
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_voice() -> String {
    "nova".to_string()
}

const fn default_output_format() -> AudioFormat {
    AudioFormat::Mp3
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

const fn default_max_upload_bytes() -> usize {
    WHISPER_MAX_UPLOAD_BYTES
}

const fn default_speed() -> f32 {
    1.0
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            stt_model: default_stt_model(),
            tts_model: default_tts_model(),
            default_voice: default_voice(),
            output_format: default_output_format(),
            timeout_ms: default_timeout_ms(),
            max_upload_bytes: default_max_upload_bytes(),
            speed: default_speed(),
        }
    }
}

impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("stt_model", &self.stt_model)
            .field("tts_model", &self.tts_model)
            .field("default_voice", &self.default_voice)
            .field("output_format", &self.output_format)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("speed", &self.speed)
            .finish()
    }
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            openai_api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    /// Return a copy of this configuration carrying the given API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.openai_api_key = Some(api_key.into());
        self
    }

    /// Validate the settings that do not depend on the credential
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate_settings(&self) -> Result<(), String> {
        if self.stt_model.trim().is_empty() || self.tts_model.trim().is_empty() {
            return Err("Speech model names must not be empty".to_string());
        }

        if self.default_voice.trim().is_empty() {
            return Err("Default voice must not be empty".to_string());
        }

        // TTS cannot emit a WebM container
        if self.output_format == AudioFormat::Webm {
            return Err("Output format webm is not supported for synthesis".to_string());
        }

        if !(0.25..=4.0).contains(&self.speed) {
            return Err(format!(
                "Speed must be between 0.25 and 4.0, got {}",
                self.speed
            ));
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.max_upload_bytes == 0 || self.max_upload_bytes > WHISPER_MAX_UPLOAD_BYTES {
            return Err(format!(
                "Max upload size must be between 1 and {WHISPER_MAX_UPLOAD_BYTES} bytes"
            ));
        }

        Ok(())
    }

    /// Validate the configuration, including the credential
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self
            .openai_api_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
        {
            return Err("OpenAI API key is required".to_string());
        }

        self.validate_settings()
    }
}
