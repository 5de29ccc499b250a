//! Types for speech processing
//!
//! Contains the audio container passed to and from the speech services and
//! the transcription result.

use serde::{Deserialize, Serialize};

pub use domain::AudioFormat;

/// Container for audio data with metadata
#[derive(Clone)]
pub struct AudioData {
    /// Raw audio bytes
    data: Vec<u8>,
    /// Audio format
    format: AudioFormat,
    /// Upload filename override
    filename: Option<String>,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            data,
            format,
            filename: None,
        }
    }

    /// Set the filename used when uploading this audio
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the audio format
    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the size of the audio data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the MIME type for this audio
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Upload filename: the override if set, else `audio.<extension>`
    #[must_use]
    pub fn filename(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("audio.{}", self.format.extension()))
    }
}

impl std::fmt::Debug for AudioData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioData")
            .field("format", &self.format)
            .field("size_bytes", &self.data.len())
            .field("filename", &self.filename)
            .finish()
    }
}

/// Result of speech-to-text transcription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Transcribed text
    pub text: String,
    /// Detected language (ISO 639-1 code)
    pub language: Option<String>,
    /// Duration of the audio in milliseconds
    pub duration_ms: Option<u64>,
}

impl Transcription {
    /// Create a simple transcription with just text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            duration_ms: None,
        }
    }

    /// Set the detected language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the audio duration
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Whether the transcription contains no speech
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod audio_data_tests {
        use super::*;

        #[test]
        fn new_audio_data() {
            let audio = AudioData::new(vec![1, 2, 3], AudioFormat::Webm);
            assert_eq!(audio.data(), &[1, 2, 3]);
            assert_eq!(audio.format(), AudioFormat::Webm);
            assert_eq!(audio.size_bytes(), 3);
            assert!(!audio.is_empty());
        }

        #[test]
        fn default_filename_uses_extension() {
            let audio = AudioData::new(vec![1], AudioFormat::Mp3);
            assert_eq!(audio.filename(), "audio.mp3");
            assert_eq!(audio.mime_type(), "audio/mpeg");
        }

        #[test]
        fn filename_override() {
            let audio = AudioData::new(vec![1], AudioFormat::Webm).with_filename("input.webm");
            assert_eq!(audio.filename(), "input.webm");
        }

        #[test]
        fn into_data_returns_bytes() {
            let audio = AudioData::new(vec![9, 8], AudioFormat::Wav);
            assert_eq!(audio.into_data(), vec![9, 8]);
        }

        #[test]
        fn debug_shows_size_not_bytes() {
            let audio = AudioData::new(vec![0xAB; 64], AudioFormat::Webm);
            let debug = format!("{audio:?}");
            assert!(debug.contains("size_bytes: 64"));
            assert!(!debug.contains("171"));
        }
    }

    mod transcription_tests {
        use super::*;

        #[test]
        fn new_creates_simple_transcription() {
            let t = Transcription::new("Hello");
            assert_eq!(t.text, "Hello");
            assert!(t.language.is_none());
            assert!(t.duration_ms.is_none());
        }

        #[test]
        fn builder_sets_metadata() {
            let t = Transcription::new("Hallo").with_language("de").with_duration(1500);
            assert_eq!(t.language.as_deref(), Some("de"));
            assert_eq!(t.duration_ms, Some(1500));
        }

        #[test]
        fn whitespace_only_is_empty() {
            assert!(Transcription::new("   \n").is_empty());
            assert!(Transcription::new("").is_empty());
            assert!(!Transcription::new(" hi ").is_empty());
        }
    }
}
