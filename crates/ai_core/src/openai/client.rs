//! OpenAI chat-completions client implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};

/// Inference engine backed by the OpenAI `/chat/completions` endpoint
pub struct OpenAIInferenceEngine {
    client: Client,
    config: InferenceConfig,
    api_key: String,
}

impl std::fmt::Debug for OpenAIInferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIInferenceEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenAIInferenceEngine {
    /// Create a new OpenAI inference engine
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be built.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InferenceError::Configuration("OpenAI API key not configured".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized OpenAI inference engine"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Map a non-success response to an error, using the provider's message when present
    async fn error_from_response(&self, response: reqwest::Response) -> InferenceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        warn!(status = %status, "Chat completion request failed");

        match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) if api_error.error.code.as_deref() == Some("rate_limit_exceeded") => {
                InferenceError::RateLimited
            },
            Ok(api_error) => InferenceError::ServerError(api_error.error.message),
            Err(_) if status == StatusCode::TOO_MANY_REQUESTS => InferenceError::RateLimited,
            Err(_) => InferenceError::ServerError(format!("Status {status}: {body}")),
        }
    }
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [InferenceMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Chat-completions response body
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI API error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[async_trait]
impl InferenceEngine for OpenAIInferenceEngine {
    #[instrument(skip(self, request), fields(model = %self.config.default_model, messages = request.messages.len()))]
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        let start = Instant::now();
        let model = self.config.default_model.as_str();

        let body = ChatCompletionRequest {
            model,
            messages: &request.messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Sending chat completion request");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout(self.config.timeout_ms)
                } else {
                    InferenceError::from(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::EmptyResponse("response contained no choices".to_string()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| InferenceError::InvalidResponse("first choice has no message content".to_string()))?;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            tokens = ?completion.usage,
            latency_ms,
            "Chat completion finished"
        );

        Ok(InferenceResponse {
            content,
            model: completion.model.unwrap_or_else(|| model.to_string()),
            usage: completion.usage,
            finish_reason: choice.finish_reason,
            latency_ms,
        })
    }
}
