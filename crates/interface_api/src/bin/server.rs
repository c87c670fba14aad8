//! Claim Pipeline - API Server Binary
//!
//! This binary starts the HTTP API server for the claim pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Run with every stage in-process
//! cargo run --bin claim-pipeline-api
//!
//! # Delegate fraud scoring to another deployment
//! API_FRAUD_SOURCE=remote API_FRAUD_URL=http://fraud:8080 cargo run --bin claim-pipeline-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_{IDENTITY,FRAUD,POLICY}_SOURCE` - `local`, `remote` or `disabled` (identity cannot be disabled)
//! * `API_{IDENTITY,FRAUD,POLICY}_URL` - Base URL of a remote stage
//! * `API_{IDENTITY,FRAUD,POLICY}_TIMEOUT_MS` - Per-stage timeout
//! * `API_CLAIMANT_NAME`, `API_CLAIMANT_DOCUMENT_ID`, `API_CLAIMANT_HISTORY` - Placeholder claimant
//! * `API_DEFAULT_POLICY_ID` - Policy claims are validated against (default: POL-001)

use interface_api::{config::ApiConfig, create_router, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - A stage source is misconfigured
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        identity = %config.identity_source,
        fraud = %config.fraud_source,
        policy = %config.policy_source,
        "Starting Claim Pipeline API Server"
    );

    let state = AppState::from_config(config.clone())?;
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
