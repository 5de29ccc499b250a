//! Value Objects - Immutable, identity-less domain primitives

mod audio_format;
mod data_uri;

pub use audio_format::AudioFormat;
pub use data_uri::DataUri;
