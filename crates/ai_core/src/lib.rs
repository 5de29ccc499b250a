//! AI Core - Chat completion engine
//!
//! Provides the `InferenceEngine` port and an OpenAI chat-completions
//! implementation of it. The engine is a thin client: one request, one
//! response, no streaming and no retries.

pub mod config;
pub mod error;
pub mod openai;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use openai::OpenAIInferenceEngine;
pub use ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
