// crates/server/src/main.rs
//! Mentor-chat server binary.
//!
//! Loads configuration, builds the Gemini client and model registry,
//! then serves the API until SIGINT/SIGTERM. The generation session is
//! released exactly once, after the server stops accepting requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use mentor_chat_core::{GeminiClient, LlmProvider, ModelRegistry};
use mentor_chat_server::{create_app, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // .env first, then the real environment wins.
    if dotenvy::dotenv().is_err() {
        eprintln!("No .env file found, reading environment variables directly");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .init();

    let config = AppConfig::from_env()?;

    let llm = Arc::new(
        GeminiClient::new(&config.gemini_api_key)
            .with_timeout(Duration::from_secs(config.gemini_timeout_secs)),
    );
    tracing::info!(provider = llm.name(), "Generation client initialized");

    let registry = ModelRegistry::with_defaults();
    tracing::info!(?registry, "Model registry loaded");

    let origins = config.cors_origins();
    let state = AppState::new(registry, llm);
    let app = create_app(state, origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "mentor-chat listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // AppState (and with it the Gemini session) drops here, after the
    // last in-flight request has completed or been abandoned.
    tracing::info!("Server exited gracefully");
    Ok(())
}

/// Resolve when SIGINT (Ctrl+C) or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests");
}
