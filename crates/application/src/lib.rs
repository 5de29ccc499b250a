//! Application layer - Use cases and orchestration
//!
//! Contains the chat pipeline and the port definitions it drives.
//! Orchestrates domain objects and infrastructure adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
