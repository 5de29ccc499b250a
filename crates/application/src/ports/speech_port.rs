//! Speech port - Interface for speech-to-text and text-to-speech operations

use async_trait::async_trait;
use domain::AudioFormat;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Recorded audio submitted for transcription
#[derive(Clone, PartialEq, Eq)]
pub struct AudioUpload {
    /// Raw audio bytes
    pub data: Vec<u8>,
    /// Container format of the recording
    pub format: AudioFormat,
    /// Filename presented to the transcription service
    pub filename: String,
}

impl std::fmt::Debug for AudioUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioUpload")
            .field("size_bytes", &self.data.len())
            .field("format", &self.format)
            .field("filename", &self.filename)
            .finish()
    }
}

/// Result of a transcription operation
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Transcribed text
    pub text: String,
    /// Detected language code (e.g., "en", "de")
    pub detected_language: Option<String>,
    /// Duration of audio in milliseconds
    pub duration_ms: Option<u64>,
}

/// Result of a speech synthesis operation
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Generated audio data
    pub audio_data: Vec<u8>,
    /// Format of the audio
    pub format: AudioFormat,
}

/// Port for speech processing operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Transcribe recorded audio to text (Speech-to-Text)
    async fn transcribe(&self, upload: AudioUpload) -> Result<TranscriptionResult, ApplicationError>;

    /// Synthesize speech from text (Text-to-Speech)
    async fn synthesize(&self, text: &str) -> Result<SynthesisResult, ApplicationError>;
}
