//! Domain layer for VoiceRelay
//!
//! Contains the conversation model exchanged with the frontend, audio value
//! objects, and domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
