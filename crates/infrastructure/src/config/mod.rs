//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `openai`: shared OpenAI credential
//! - `pipeline`: chat pipeline timing and logging

mod openai;
mod pipeline;
mod server;

use ai_core::InferenceConfig;
use ai_speech::SpeechConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use openai::OpenAIConfig;
pub use pipeline::{PipelineAppConfig, TelemetryAppConfig};
pub use server::{LogFormat, ServerConfig};

/// Prefix for environment overrides, e.g. `VOICERELAY_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "VOICERELAY";

/// Conventional variable consulted when no key is configured explicitly
pub const FALLBACK_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenAI credential
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Chat completion configuration
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Transcription and synthesis configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Chat pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineAppConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from an optional `config.toml` and the environment
    ///
    /// `OPENAI_API_KEY` is used when no key was configured under the
    /// application prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        Ok(Self::load_from(Some("config"), Self::environment())?
            .with_fallback_api_key(std::env::var(FALLBACK_API_KEY_VAR).ok()))
    }

    /// Build the configuration from an optional file and an environment source
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load_from(
        file: Option<&str>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(name) = file {
            debug!(file = name, "Looking for configuration file");
            builder = builder.add_source(config::File::with_name(name).required(false));
        }

        builder
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Environment source using the application prefix
    ///
    /// Nested keys use a double underscore, so snake_case field names survive:
    /// `VOICERELAY_INFERENCE__DEFAULT_MODEL=gpt-4o-mini`.
    #[must_use]
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("server.allowed_origins")
            .try_parsing(true)
    }

    /// Fill in the API key from a fallback value when none is configured
    #[must_use]
    pub fn with_fallback_api_key(mut self, fallback: Option<String>) -> Self {
        if !self.openai.has_api_key()
            && let Some(key) = fallback.filter(|key| !key.trim().is_empty())
        {
            debug!("Using {FALLBACK_API_KEY_VAR} as OpenAI credential");
            self.openai.api_key = Some(SecretString::from(key));
        }
        self
    }

    /// The configured API key, if any non-blank key is present
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.openai
            .api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.trim().is_empty())
    }

    /// Chat completion configuration carrying the API key
    #[must_use]
    pub fn inference_config(&self) -> InferenceConfig {
        let config = self.inference.clone();
        match self.api_key() {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }

    /// Speech configuration carrying the API key
    #[must_use]
    pub fn speech_config(&self) -> SpeechConfig {
        let config = self.speech.clone();
        match self.api_key() {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }

    /// Validate every section
    ///
    /// A missing API key is not a validation error; the chat endpoints
    /// report it per request instead.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid section.
    pub fn validate(&self) -> Result<(), String> {
        self.server
            .validate()
            .map_err(|e| format!("server: {e}"))?;
        self.inference
            .validate()
            .map_err(|e| format!("inference: {e}"))?;
        self.speech
            .validate_settings()
            .map_err(|e| format!("speech: {e}"))?;
        self.pipeline
            .validate()
            .map_err(|e| format!("pipeline: {e}"))?;
        Ok(())
    }
}
