//! Request and response bodies shared by the chat handlers

use application::AssistantReply;
use domain::{ConversationHistory, MessageRole};
use serde::{Deserialize, Serialize};

/// Body accepted by both chat endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first
    pub messages: ConversationHistory,
    /// Recorded audio as a base64 data URI (voice endpoint only)
    #[serde(default, rename = "audioInput")]
    pub audio_input: Option<String>,
}

impl ChatRequest {
    /// Parse a raw request body
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed bodies, missing `messages` or
    /// unknown message roles.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Assistant reply returned to the frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantResponse {
    /// Always `assistant`
    pub role: MessageRole,
    /// Reply text
    pub content: String,
    /// Reply audio as a data URI
    pub audio: String,
    /// The user message the reply answers (voice endpoint only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_transcript: Option<String>,
}

impl AssistantResponse {
    /// Response for a text turn
    #[must_use]
    pub fn from_reply(reply: AssistantReply) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: reply.content,
            audio: reply.audio,
            user_transcript: None,
        }
    }

    /// Response for a voice turn
    #[must_use]
    pub fn with_transcript(reply: AssistantReply, user_transcript: String) -> Self {
        Self {
            user_transcript: Some(user_transcript),
            ..Self::from_reply(reply)
        }
    }
}

/// Tells the frontend to drop a silent recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IgnoreResponse {
    /// Always `ignore`
    pub action: &'static str,
}

impl Default for IgnoreResponse {
    fn default() -> Self {
        Self { action: "ignore" }
    }
}

/// Body returned by the voice endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VoiceChatResponse {
    Reply(AssistantResponse),
    Ignore(IgnoreResponse),
}
