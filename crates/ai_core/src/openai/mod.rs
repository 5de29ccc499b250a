//! OpenAI chat-completions engine

mod client;

pub use client::OpenAIInferenceEngine;
