//! Ports - Interfaces for external dependencies
//!
//! Implemented by adapters in the infrastructure layer.

mod inference_port;
mod speech_port;

pub use inference_port::{InferencePort, InferenceResult};
pub use speech_port::{AudioUpload, SpeechPort, SynthesisResult, TranscriptionResult};

#[cfg(test)]
pub use inference_port::MockInferencePort;
#[cfg(test)]
pub use speech_port::MockSpeechPort;
