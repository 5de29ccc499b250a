//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on top of the OpenAI
//! clients, and owns configuration loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod pipeline_factory;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, LogFormat, OpenAIConfig, PipelineAppConfig, ServerConfig, TelemetryAppConfig,
};
pub use pipeline_factory::build_chat_pipeline;
pub use telemetry::{TelemetryError, init_tracing};
