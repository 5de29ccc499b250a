//! Chat pipeline - the turn workflow behind both chat endpoints
//!
//! A turn runs strictly sequential stages:
//! 1. Resolve the user message (transcribe `audioInput`, or fall back to the
//!    last message in the history)
//! 2. Compose the history sent to the model
//! 3. Complete the chat and trim the reply
//! 4. Synthesize the reply to speech
//! 5. Encode the audio as a data URI
//!
//! Every awaited stage is bounded by `PipelineConfig::stage_timeout`.

use std::{borrow::Cow, fmt, future::Future, sync::Arc, time::Duration};

use domain::{AudioFormat, ConversationHistory, DataUri, MessageRole};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{AudioUpload, InferencePort, SpeechPort, SynthesisResult},
};

/// Configuration for the chat pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Time budget for each upstream stage
    pub stage_timeout: Duration,
    /// Filename presented to the transcription service
    pub upload_filename: String,
    /// Container format assumed for recorded audio
    pub upload_format: AudioFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(60),
            upload_filename: "input.webm".to_string(),
            upload_format: AudioFormat::Webm,
        }
    }
}

/// Where the user message of a voice turn came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    /// Transcribed from the submitted recording
    Transcribed,
    /// Taken from the last message of the supplied history
    LastMessage,
}

/// The user message a voice turn responds to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUserMessage {
    /// Message text, exactly as transcribed or supplied
    pub content: String,
    /// Origin of the text
    pub source: MessageSource,
}

impl ResolvedUserMessage {
    /// Whether there is nothing to respond to
    pub fn is_silent(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Assistant reply with its synthesized audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    /// Trimmed reply text
    pub content: String,
    /// Reply audio as a `data:audio/...;base64,` URI
    pub audio: String,
}

/// Outcome of a voice turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceTurnOutcome {
    /// No speech was detected; nothing was sent upstream after transcription
    Ignored,
    /// The assistant replied
    Replied {
        /// Assistant reply and audio
        reply: AssistantReply,
        /// The user message the reply answers
        user_transcript: String,
    },
}

/// Service running text and voice chat turns against the AI ports
pub struct ChatPipeline {
    inference: Arc<dyn InferencePort>,
    speech: Arc<dyn SpeechPort>,
    config: PipelineConfig,
}

impl fmt::Debug for ChatPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChatPipeline {
    /// Create a pipeline with default configuration
    pub fn new(inference: Arc<dyn InferencePort>, speech: Arc<dyn SpeechPort>) -> Self {
        Self::with_config(inference, speech, PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(
        inference: Arc<dyn InferencePort>,
        speech: Arc<dyn SpeechPort>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            inference,
            speech,
            config,
        }
    }

    /// Get the pipeline configuration
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a text turn: complete the history, then speak the reply
    ///
    /// # Errors
    ///
    /// Returns an error if any stage fails or times out.
    #[instrument(skip(self, history), fields(messages = history.len()))]
    pub async fn text_turn(
        &self,
        history: &ConversationHistory,
    ) -> Result<AssistantReply, ApplicationError> {
        info!("Processing text turn");
        self.reply_to(history).await
    }

    /// Run a voice turn
    ///
    /// `audio_input` is a base64 data URI of the recording; `None` or an
    /// empty string falls back to the last message of `history`.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording cannot be decoded, or if any stage
    /// fails or times out.
    #[instrument(skip(self, history, audio_input), fields(
        messages = history.len(),
        has_audio = audio_input.is_some_and(|a| !a.trim().is_empty())
    ))]
    pub async fn voice_turn(
        &self,
        history: &ConversationHistory,
        audio_input: Option<&str>,
    ) -> Result<VoiceTurnOutcome, ApplicationError> {
        info!("Processing voice turn");

        let user_message = self.resolve_user_message(history, audio_input).await?;

        if user_message.is_silent() {
            info!(source = ?user_message.source, "No speech detected, ignoring turn");
            return Ok(VoiceTurnOutcome::Ignored);
        }

        let composed = Self::compose_history(history, &user_message);
        let reply = self.reply_to(&composed).await?;

        Ok(VoiceTurnOutcome::Replied {
            reply,
            user_transcript: user_message.content,
        })
    }

    /// Determine the user message of a voice turn
    ///
    /// # Errors
    ///
    /// Returns an error if the recording is not a valid data URI or
    /// transcription fails.
    pub async fn resolve_user_message(
        &self,
        history: &ConversationHistory,
        audio_input: Option<&str>,
    ) -> Result<ResolvedUserMessage, ApplicationError> {
        match audio_input.filter(|a| !a.trim().is_empty()) {
            Some(audio_input) => {
                let recording = DataUri::parse(audio_input)?;

                let upload = AudioUpload {
                    data: recording.into_data(),
                    format: self.config.upload_format,
                    filename: self.config.upload_filename.clone(),
                };

                debug!(size_bytes = upload.data.len(), "Transcribing recording");

                let transcription = self
                    .bounded("transcription", self.speech.transcribe(upload))
                    .await?;

                debug!(
                    text_len = transcription.text.len(),
                    language = ?transcription.detected_language,
                    "Transcription complete"
                );

                Ok(ResolvedUserMessage {
                    content: transcription.text,
                    source: MessageSource::Transcribed,
                })
            },
            None => {
                let last = history.last_message();

                if let Some(message) = last.filter(|m| m.role != MessageRole::User) {
                    debug!(role = %message.role, "Falling back to a non-user last message");
                }

                Ok(ResolvedUserMessage {
                    content: last.map(|m| m.content.clone()).unwrap_or_default(),
                    source: MessageSource::LastMessage,
                })
            },
        }
    }

    /// History sent to the model for a voice turn
    ///
    /// A transcribed message is appended as a new user message; a fallback
    /// message already ends the history, which is used unmodified.
    pub fn compose_history<'a>(
        history: &'a ConversationHistory,
        user_message: &ResolvedUserMessage,
    ) -> Cow<'a, ConversationHistory> {
        match user_message.source {
            MessageSource::Transcribed => {
                Cow::Owned(history.with_user_message(user_message.content.clone()))
            },
            MessageSource::LastMessage => Cow::Borrowed(history),
        }
    }

    /// Complete the conversation and trim the reply
    ///
    /// # Errors
    ///
    /// Returns an error if the inference port fails or times out.
    pub async fn complete(&self, history: &ConversationHistory) -> Result<String, ApplicationError> {
        let result = self
            .bounded("completion", self.inference.generate_with_context(history))
            .await?;

        debug!(
            model = %result.model,
            tokens = ?result.tokens_used,
            latency_ms = result.latency_ms,
            "Completion received"
        );

        Ok(result.content.trim().to_string())
    }

    /// Synthesize the reply to speech
    ///
    /// # Errors
    ///
    /// Returns an error if the speech port fails or times out.
    pub async fn synthesize(&self, text: &str) -> Result<SynthesisResult, ApplicationError> {
        self.bounded("synthesis", self.speech.synthesize(text)).await
    }

    /// Encode synthesized audio as a data URI
    pub fn encode_audio(synthesis: SynthesisResult) -> String {
        DataUri::new(synthesis.format.data_uri_mime(), synthesis.audio_data).to_string()
    }

    async fn reply_to(&self, history: &ConversationHistory) -> Result<AssistantReply, ApplicationError> {
        let content = self.complete(history).await?;
        let synthesis = self.synthesize(&content).await?;

        debug!(
            reply_len = content.len(),
            audio_bytes = synthesis.audio_data.len(),
            "Reply synthesized"
        );

        Ok(AssistantReply {
            content,
            audio: Self::encode_audio(synthesis),
        })
    }

    /// Run a stage under the configured time budget
    async fn bounded<T>(
        &self,
        stage: &'static str,
        future: impl Future<Output = Result<T, ApplicationError>>,
    ) -> Result<T, ApplicationError> {
        match tokio::time::timeout(self.config.stage_timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms =
                    u64::try_from(self.config.stage_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(stage, timeout_ms, "Pipeline stage timed out");
                Err(ApplicationError::Timeout { stage, timeout_ms })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{InferenceResult, MockInferencePort, MockSpeechPort, TranscriptionResult};
    use async_trait::async_trait;
    use domain::ChatMessage;

    fn inference_result(content: &str) -> InferenceResult {
        InferenceResult {
            content: content.to_string(),
            model: "gpt-4o".to_string(),
            tokens_used: Some(20),
            latency_ms: 10,
        }
    }

    fn transcription(text: &str) -> TranscriptionResult {
        TranscriptionResult {
            text: text.to_string(),
            detected_language: None,
            duration_ms: None,
        }
    }

    fn mp3(bytes: &[u8]) -> SynthesisResult {
        SynthesisResult {
            audio_data: bytes.to_vec(),
            format: AudioFormat::Mp3,
        }
    }

    fn pipeline(inference: MockInferencePort, speech: MockSpeechPort) -> ChatPipeline {
        ChatPipeline::new(Arc::new(inference), Arc::new(speech))
    }

    fn history() -> ConversationHistory {
        ConversationHistory::new(vec![
            ChatMessage::system("You are a voice assistant"),
            ChatMessage::user("What time is it?"),
        ])
    }

    mod text_turn_tests {
        use super::*;

        #[tokio::test]
        async fn returns_trimmed_reply_and_audio() {
            let mut inference = MockInferencePort::new();
            inference
                .expect_generate_with_context()
                .withf(|h| h.len() == 2)
                .times(1)
                .returning(|_| Ok(inference_result("  Hello there \n")));

            let mut speech = MockSpeechPort::new();
            speech
                .expect_synthesize()
                .withf(|text| text.to_string() == "Hello there")
                .times(1)
                .returning(|_| Ok(mp3(&[0x01, 0x02])));
            speech.expect_transcribe().never();

            let reply = pipeline(inference, speech).text_turn(&history()).await.unwrap();

            assert_eq!(reply.content, "Hello there");
            assert_eq!(reply.audio, "data:audio/mp3;base64,AQI=");
        }

        #[tokio::test]
        async fn synthesis_failure_propagates() {
            let mut inference = MockInferencePort::new();
            inference
                .expect_generate_with_context()
                .returning(|_| Ok(inference_result("Hi")));

            let mut speech = MockSpeechPort::new();
            speech
                .expect_synthesize()
                .returning(|_| Err(ApplicationError::Upstream("TTS API Error".to_string())));

            let err = pipeline(inference, speech)
                .text_turn(&history())
                .await
                .unwrap_err();

            assert_eq!(err.to_string(), "TTS API Error");
        }

        #[tokio::test]
        async fn inference_failure_skips_synthesis() {
            let mut inference = MockInferencePort::new();
            inference
                .expect_generate_with_context()
                .returning(|_| Err(ApplicationError::Inference("boom".to_string())));

            let mut speech = MockSpeechPort::new();
            speech.expect_synthesize().never();

            let result = pipeline(inference, speech).text_turn(&history()).await;
            assert!(matches!(result, Err(ApplicationError::Inference(_))));
        }
    }

    mod voice_turn_tests {
        use super::*;

        #[tokio::test]
        async fn transcribed_audio_is_appended_to_history() {
            let mut speech = MockSpeechPort::new();
            speech
                .expect_transcribe()
                .withf(|upload| {
                    upload.data == vec![1, 2, 3]
                        && upload.filename == "input.webm"
                        && upload.format == AudioFormat::Webm
                })
                .times(1)
                .returning(|_| Ok(transcription("Tell me a joke")));
            speech
                .expect_synthesize()
                .times(1)
                .returning(|_| Ok(mp3(&[9])));

            let mut inference = MockInferencePort::new();
            inference
                .expect_generate_with_context()
                .withf(|h| {
                    h.len() == 3
                        && h.last_message()
                            == Some(&ChatMessage::user("Tell me a joke"))
                })
                .times(1)
                .returning(|_| Ok(inference_result("Why did the crab cross the road?")));

            let original = history();
            let outcome = pipeline(inference, speech)
                .voice_turn(&original, Some("data:audio/webm;base64,AQID"))
                .await
                .unwrap();

            assert_eq!(original.len(), 2);
            match outcome {
                VoiceTurnOutcome::Replied {
                    reply,
                    user_transcript,
                } => {
                    assert_eq!(user_transcript, "Tell me a joke");
                    assert_eq!(reply.content, "Why did the crab cross the road?");
                    assert_eq!(reply.audio, "data:audio/mp3;base64,CQ==");
                },
                VoiceTurnOutcome::Ignored => panic!("turn should not be ignored"),
            }
        }

        #[tokio::test]
        async fn silent_transcription_is_ignored() {
            let mut speech = MockSpeechPort::new();
            speech
                .expect_transcribe()
                .times(1)
                .returning(|_| Ok(transcription("   ")));
            speech.expect_synthesize().never();

            let mut inference = MockInferencePort::new();
            inference.expect_generate_with_context().never();

            let outcome = pipeline(inference, speech)
                .voice_turn(&history(), Some("data:audio/webm;base64,AQID"))
                .await
                .unwrap();

            assert_eq!(outcome, VoiceTurnOutcome::Ignored);
        }

        #[tokio::test]
        async fn missing_audio_falls_back_to_last_message() {
            let mut speech = MockSpeechPort::new();
            speech.expect_transcribe().never();
            speech.expect_synthesize().returning(|_| Ok(mp3(&[1])));

            let mut inference = MockInferencePort::new();
            inference
                .expect_generate_with_context()
                .withf(|h| h.messages() == history().messages())
                .times(1)
                .returning(|_| Ok(inference_result("It is noon")));

            let outcome = pipeline(inference, speech)
                .voice_turn(&history(), None)
                .await
                .unwrap();

            match outcome {
                VoiceTurnOutcome::Replied {
                    user_transcript, ..
                } => assert_eq!(user_transcript, "What time is it?"),
                VoiceTurnOutcome::Ignored => panic!("turn should not be ignored"),
            }
        }

        #[tokio::test]
        async fn empty_audio_string_counts_as_absent() {
            let mut speech = MockSpeechPort::new();
            speech.expect_transcribe().never();
            speech.expect_synthesize().returning(|_| Ok(mp3(&[1])));

            let mut inference = MockInferencePort::new();
            inference
                .expect_generate_with_context()
                .times(1)
                .returning(|_| Ok(inference_result("ok")));

            let outcome = pipeline(inference, speech)
                .voice_turn(&history(), Some(""))
                .await
                .unwrap();

            assert!(matches!(outcome, VoiceTurnOutcome::Replied { .. }));
        }

        #[tokio::test]
        async fn empty_history_without_audio_is_ignored() {
            let mut speech = MockSpeechPort::new();
            speech.expect_transcribe().never();
            speech.expect_synthesize().never();

            let mut inference = MockInferencePort::new();
            inference.expect_generate_with_context().never();

            let outcome = pipeline(inference, speech)
                .voice_turn(&ConversationHistory::default(), None)
                .await
                .unwrap();

            assert_eq!(outcome, VoiceTurnOutcome::Ignored);
        }

        #[tokio::test]
        async fn invalid_audio_is_a_domain_error() {
            let mut speech = MockSpeechPort::new();
            speech.expect_transcribe().never();

            let inference = MockInferencePort::new();

            let result = pipeline(inference, speech)
                .voice_turn(&history(), Some("data:audio/webm;base64,@@@"))
                .await;

            assert!(matches!(result, Err(ApplicationError::Domain(_))));
        }

        #[tokio::test]
        async fn transcription_error_keeps_upstream_message() {
            let mut speech = MockSpeechPort::new();
            speech.expect_transcribe().returning(|_| {
                Err(ApplicationError::Upstream("Invalid file format.".to_string()))
            });

            let inference = MockInferencePort::new();

            let err = pipeline(inference, speech)
                .voice_turn(&history(), Some("AQID"))
                .await
                .unwrap_err();

            assert_eq!(err.to_string(), "Invalid file format.");
        }
    }

    mod stage_tests {
        use super::*;

        #[test]
        fn compose_history_appends_only_transcriptions() {
            let original = history();

            let transcribed = ResolvedUserMessage {
                content: "Hi".to_string(),
                source: MessageSource::Transcribed,
            };
            let composed = ChatPipeline::compose_history(&original, &transcribed);
            assert_eq!(composed.len(), 3);
            assert!(matches!(composed, Cow::Owned(_)));

            let fallback = ResolvedUserMessage {
                content: "What time is it?".to_string(),
                source: MessageSource::LastMessage,
            };
            let composed = ChatPipeline::compose_history(&original, &fallback);
            assert_eq!(*composed, original);
            assert!(matches!(composed, Cow::Borrowed(_)));
        }

        #[test]
        fn encode_audio_produces_mp3_data_uri() {
            assert_eq!(
                ChatPipeline::encode_audio(mp3(&[0x01, 0x02])),
                "data:audio/mp3;base64,AQI="
            );
        }

        #[test]
        fn silence_detection() {
            let silent = ResolvedUserMessage {
                content: " \t\n".to_string(),
                source: MessageSource::Transcribed,
            };
            assert!(silent.is_silent());
        }

        #[tokio::test]
        async fn fallback_to_assistant_message_is_allowed() {
            let history = ConversationHistory::new(vec![ChatMessage::assistant("Anything else?")]);
            let p = pipeline(MockInferencePort::new(), MockSpeechPort::new());

            let resolved = p.resolve_user_message(&history, None).await.unwrap();
            assert_eq!(resolved.content, "Anything else?");
            assert_eq!(resolved.source, MessageSource::LastMessage);
        }
    }

    mod timeout_tests {
        use super::*;

        struct SlowInference;

        #[async_trait]
        impl InferencePort for SlowInference {
            async fn generate_with_context(
                &self,
                _history: &ConversationHistory,
            ) -> Result<InferenceResult, ApplicationError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(inference_result("too late"))
            }
        }

        #[tokio::test]
        async fn slow_completion_times_out() {
            let mut speech = MockSpeechPort::new();
            speech.expect_synthesize().never();

            let pipeline = ChatPipeline::with_config(
                Arc::new(SlowInference),
                Arc::new(speech),
                PipelineConfig {
                    stage_timeout: Duration::from_millis(20),
                    ..Default::default()
                },
            );

            let result = pipeline.text_turn(&history()).await;

            assert!(matches!(
                result,
                Err(ApplicationError::Timeout {
                    stage: "completion",
                    timeout_ms: 20
                })
            ));
        }
    }
}
