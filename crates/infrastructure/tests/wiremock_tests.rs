//! Integration tests for the infrastructure crate
//!
//! Builds the chat pipeline from configuration and runs it against a
//! WireMock server standing in for the OpenAI chat, transcription and
//! speech endpoints.

use application::{ApplicationError, ChatPipeline, VoiceTurnOutcome};
use domain::{ChatMessage, ConversationHistory, DataUri};
use infrastructure::{AppConfig, SYNTHESIS_FAILURE_MESSAGE, build_chat_pipeline};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

const SPEECH_BYTES: &[u8] = b"ID3-fake-mp3-bytes";

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default().with_fallback_api_key(Some("sk-test".to_string()));
    config.inference.base_url = server.uri();
    config.speech.openai_base_url = server.uri();
    config.inference.timeout_ms = 5_000;
    config.speech.timeout_ms = 5_000;
    config
}

fn pipeline_for(server: &MockServer) -> ChatPipeline {
    build_chat_pipeline(&config_for(server))
        .expect("pipeline should build")
        .expect("api key is configured")
}

fn history() -> ConversationHistory {
    ConversationHistory::new(vec![
        ChatMessage::system("You are a friendly assistant"),
        ChatMessage::user("Hi"),
    ])
}

fn recording() -> String {
    DataUri::new("audio/webm;codecs=opus", vec![0x1A, 0x45, 0xDF, 0xA3, 0x01]).to_string()
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
    })
}

async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(server)
        .await;
}

async fn mount_speech(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(SPEECH_BYTES))
        .mount(server)
        .await;
}

async fn mount_transcription(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": text })))
        .mount(server)
        .await;
}

/// Messages sent in the single recorded chat-completions request
async fn sent_messages(server: &MockServer) -> Vec<serde_json::Value> {
    let requests = server.received_requests().await.unwrap_or_default();
    let request = requests
        .iter()
        .find(|r| r.url.path() == "/chat/completions")
        .expect("chat completions was called");
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    body["messages"].as_array().cloned().unwrap_or_default()
}

// =============================================================================
// Text Turns
// =============================================================================

#[tokio::test]
async fn text_turn_returns_trimmed_reply_and_audio() {
    let server = MockServer::start().await;
    mount_completion(&server, "  Hello there!\n").await;
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .and(body_partial_json(serde_json::json!({
            "model": "tts-1",
            "voice": "nova",
            "input": "Hello there!"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(SPEECH_BYTES))
        .expect(1)
        .mount(&server)
        .await;

    let reply = pipeline_for(&server).text_turn(&history()).await.unwrap();

    assert_eq!(reply.content, "Hello there!");
    assert!(reply.audio.starts_with("data:audio/mp3;base64,"));
    let decoded = DataUri::parse(&reply.audio).unwrap();
    assert_eq!(decoded.data(), SPEECH_BYTES);
}

#[tokio::test]
async fn text_turn_forwards_history_unchanged() {
    let server = MockServer::start().await;
    mount_completion(&server, "Sure").await;
    mount_speech(&server).await;

    pipeline_for(&server).text_turn(&history()).await.unwrap();

    let messages = sent_messages(&server).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "Hi");
}

#[tokio::test]
async fn synthesis_failure_reports_fixed_message() {
    let server = MockServer::start().await;
    mount_completion(&server, "Hello").await;
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = pipeline_for(&server).text_turn(&history()).await.unwrap_err();

    assert_eq!(err.to_string(), SYNTHESIS_FAILURE_MESSAGE);
}

#[tokio::test]
async fn completion_failure_skips_synthesis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(SPEECH_BYTES))
        .expect(0)
        .mount(&server)
        .await;

    let err = pipeline_for(&server).text_turn(&history()).await.unwrap_err();

    assert!(matches!(err, ApplicationError::Inference(_)));
}

// =============================================================================
// Voice Turns
// =============================================================================

#[tokio::test]
async fn voice_turn_appends_transcript() {
    let server = MockServer::start().await;
    mount_transcription(&server, "What time is it?").await;
    mount_completion(&server, "It is noon.").await;
    mount_speech(&server).await;

    let outcome = pipeline_for(&server)
        .voice_turn(&history(), Some(&recording()))
        .await
        .unwrap();

    match outcome {
        VoiceTurnOutcome::Replied {
            reply,
            user_transcript,
        } => {
            assert_eq!(user_transcript, "What time is it?");
            assert_eq!(reply.content, "It is noon.");
        },
        VoiceTurnOutcome::Ignored => panic!("expected a reply"),
    }

    let messages = sent_messages(&server).await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2]["role"], "user");
    assert_eq!(messages[2]["content"], "What time is it?");
}

#[tokio::test]
async fn silent_recording_is_ignored() {
    let server = MockServer::start().await;
    mount_transcription(&server, "   ").await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(SPEECH_BYTES))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = pipeline_for(&server)
        .voice_turn(&history(), Some(&recording()))
        .await
        .unwrap();

    assert_eq!(outcome, VoiceTurnOutcome::Ignored);
}

#[tokio::test]
async fn voice_turn_without_audio_uses_last_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "x"})))
        .expect(0)
        .mount(&server)
        .await;
    mount_completion(&server, "Hello!").await;
    mount_speech(&server).await;

    let outcome = pipeline_for(&server).voice_turn(&history(), None).await.unwrap();

    assert!(matches!(
        outcome,
        VoiceTurnOutcome::Replied { ref user_transcript, .. } if user_transcript == "Hi"
    ));
    assert_eq!(sent_messages(&server).await.len(), 2);
}

#[tokio::test]
async fn transcription_error_message_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"message": "Invalid file format.", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = pipeline_for(&server)
        .voice_turn(&history(), Some(&recording()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid file format.");
}

#[tokio::test]
async fn malformed_audio_never_reaches_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = pipeline_for(&server)
        .voice_turn(&history(), Some("not a data uri"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(_)));
}
