//! Adapters implementing application ports

mod openai_inference_adapter;
mod speech_adapter;

pub use openai_inference_adapter::OpenAIInferenceAdapter;
pub use speech_adapter::{SYNTHESIS_FAILURE_MESSAGE, SpeechAdapter};
