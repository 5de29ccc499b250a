//! VoiceRelay HTTP presentation layer
//!
//! Serves the text and voice chat endpoints consumed by the web frontend.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorDisclosure, ErrorResponse, GENERIC_FAILURE_MESSAGE};
pub use handlers::payload::{AssistantResponse, ChatRequest, IgnoreResponse, VoiceChatResponse};
pub use middleware::{REQUEST_ID_HEADER, RequestId};
pub use routes::{create_app, create_router};
pub use state::AppState;
