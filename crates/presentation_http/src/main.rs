//! VoiceRelay HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::time::Duration;

use anyhow::Context;
use infrastructure::{AppConfig, build_chat_pipeline, init_tracing};
use presentation_http::{AppState, create_app};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (
            AppConfig::default().with_fallback_api_key(std::env::var("OPENAI_API_KEY").ok()),
            Some(e),
        ),
    };

    init_tracing(&config.telemetry, config.server.log_format)?;

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        model = %config.inference.default_model,
        voice = %config.speech.default_voice,
        api_key_configured = config.openai.has_api_key(),
        "Configuration loaded"
    );

    let pipeline = build_chat_pipeline(&config).context("Failed to build chat pipeline")?;
    let app = create_app(AppState::new(pipeline), &config.server);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "VoiceRelay server listening");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = wait_for_signal("Ctrl+C", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = wait_for_signal("SIGTERM", async {
        signal::unix::signal(signal::unix::SignalKind::terminate())?
            .recv()
            .await;
        Ok::<(), std::io::Error>(())
    });

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }

    // Connections still open after the grace period are dropped.
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!(?timeout, "Graceful shutdown timed out, exiting");
        std::process::exit(1);
    });
}

/// Waits for a signal; a handler that cannot be installed never fires
async fn wait_for_signal<E: std::fmt::Display>(
    name: &str,
    signal: impl Future<Output = Result<(), E>>,
) {
    if let Err(e) = signal.await {
        error!(signal = name, error = %e, "Failed to install signal handler");
        std::future::pending::<()>().await;
    }
}
