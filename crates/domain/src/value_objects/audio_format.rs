//! Audio container formats exchanged with the frontend and speech services

use serde::{Deserialize, Serialize};

/// Audio formats handled by the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// WebM container (browser `MediaRecorder` output)
    Webm,
    /// MP3 format (TTS output)
    Mp3,
    /// WAV format
    Wav,
    /// OGG container
    Ogg,
}

impl AudioFormat {
    /// Get the MIME type for this format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
        }
    }

    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
        }
    }

    /// MIME type used when embedding audio of this format in a data URI
    ///
    /// The frontend plays `data:audio/mp3;...` clips, so this is
    /// `audio/<extension>` rather than the IANA type.
    #[must_use]
    pub fn data_uri_mime(&self) -> String {
        format!("audio/{}", self.extension())
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
