//! Railwise - Track Maintenance Planning Intelligence
//!
//! HTTP service that turns per-segment track risk predictions into
//! recommended maintenance intervention windows.
//!
//! # Usage
//!
//! ```bash
//! # Run with the shipped datasets and model artifacts
//! cargo run --release
//!
//! # Override the bind address
//! cargo run --release -- --addr 127.0.0.1:9000
//! ```
//!
//! # Environment Variables
//!
//! - `RAILWISE_CONFIG`: Path to a TOML config file (default: ./railwise.toml)
//! - `RAILWISE_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use railwise::api::{create_app, PlannerState};
use railwise::config::{self, ServiceConfig};
use railwise::inference::InferenceContext;
use railwise::report::TemplateReporter;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "railwise")]
#[command(about = "Railwise Track Maintenance Planning Service")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default: from config, "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a TOML config file (overrides RAILWISE_CONFIG)
    #[arg(short, long)]
    config: Option<String>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    // Load configuration: CLI path beats env var beats ./railwise.toml
    let service_config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => ServiceConfig::load(),
    };
    config::init(service_config);

    // Fitted artifacts load once; a missing model is a fatal startup error.
    let inference = InferenceContext::load(&config::get().models)
        .context("failed to load inference artifacts")?;

    let state = PlannerState {
        inference: Arc::new(inference),
        reporter: Arc::new(TemplateReporter),
    };
    let app = create_app(state);

    let server_addr = args
        .addr
        .unwrap_or_else(|| config::get().server.addr.clone());

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("failed to bind to {server_addr}"))?;

    info!("HTTP server listening on {server_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("received shutdown signal");
        })
        .await
        .context("HTTP server error")?;

    info!("graceful shutdown complete");
    Ok(())
}
