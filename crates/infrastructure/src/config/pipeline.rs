//! Chat pipeline and logging configuration.

use std::time::Duration;

use application::PipelineConfig;
use domain::AudioFormat;
use serde::{Deserialize, Serialize};

/// Pipeline settings as read from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineAppConfig {
    /// Time budget for each upstream stage in milliseconds
    #[serde(default = "default_stage_timeout_ms")]
    pub stage_timeout_ms: u64,

    /// Filename presented to the transcription service
    #[serde(default = "default_upload_filename")]
    pub upload_filename: String,

    /// Container format assumed for recorded audio
    #[serde(default = "default_upload_format")]
    pub upload_format: AudioFormat,
}

const fn default_stage_timeout_ms() -> u64 {
    60_000
}

fn default_upload_filename() -> String {
    "input.webm".to_string()
}

const fn default_upload_format() -> AudioFormat {
    AudioFormat::Webm
}

impl Default for PipelineAppConfig {
    fn default() -> Self {
        Self {
            stage_timeout_ms: default_stage_timeout_ms(),
            upload_filename: default_upload_filename(),
            upload_format: default_upload_format(),
        }
    }
}

impl PipelineAppConfig {
    /// Convert into the application-layer configuration
    #[must_use]
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            stage_timeout: Duration::from_millis(self.stage_timeout_ms),
            upload_filename: self.upload_filename.clone(),
            upload_format: self.upload_format,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.stage_timeout_ms == 0 {
            return Err("Pipeline stage timeout must be greater than 0".to_string());
        }

        if self.upload_filename.trim().is_empty() {
            return Err("Upload filename must not be empty".to_string());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryAppConfig {
    /// Log level filter; `RUST_LOG` takes precedence when set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "voicerelay_server=info,presentation_http=info,application=info,infrastructure=info,\
     ai_core=info,ai_speech=info,tower_http=info"
        .to_string()
}

impl Default for TelemetryAppConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}
