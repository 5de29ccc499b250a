//! AI Speech - Speech-to-Text and Text-to-Speech abstractions
//!
//! Provides traits and an OpenAI implementation for speech processing:
//! - `SpeechToText` - Transcribe recorded audio to text (Whisper)
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains the concrete implementation (adapter)
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{OpenAISpeechProvider, SpeechToText, TextToSpeech, AudioData, AudioFormat};
//!
//! let provider = OpenAISpeechProvider::new(config)?;
//!
//! let audio = AudioData::new(bytes, AudioFormat::Webm).with_filename("input.webm");
//! let transcription = provider.transcribe(audio).await?;
//!
//! let speech = provider.synthesize(&transcription.text).await?;
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::openai::OpenAISpeechProvider;
pub use types::{AudioData, AudioFormat, Transcription};
