//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    handlers,
    middleware::{payload_too_large_as_json, propagate_request_id},
    state::AppState,
};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/chat",
            post(handlers::chat::chat).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/voice-chat",
            post(handlers::voice_chat::voice_chat).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}

/// Create the router wrapped in the server's middleware stack
pub fn create_app(state: AppState, server: &ServerConfig) -> Router {
    // Each Router::layer call wraps the previous ones; within a ServiceBuilder
    // the first layer is outermost.
    let app = create_router(state)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(server.max_body_size_bytes)),
        )
        .layer(middleware::map_response(payload_too_large_as_json))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(propagate_request_id))
                .layer(TraceLayer::new_for_http()),
        );

    if server.cors_enabled {
        app.layer(cors_layer(&server.allowed_origins))
    } else {
        app
    }
}

/// CORS for the frontend; an empty origin list allows every origin
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
