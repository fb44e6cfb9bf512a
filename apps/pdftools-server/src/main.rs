//! PDF Tools Server binary
//!
//! Loads configuration (flags, environment, `.env`), sets up logging and
//! per-IP rate limiting, and serves the API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pdftools_server::binaries::Tool;
use pdftools_server::config::Config;
use pdftools_server::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::parse();

    // Initialize logging
    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PDF tools server on {}:{}", config.host, config.port);

    let state = AppState::from_config(&config);
    for tool in Tool::ALL {
        match state.resolver.resolve(tool) {
            Some(path) => info!("{}: {}", tool.display_name(), path.display()),
            None => warn!("{} not found; its endpoints will answer 501", tool.display_name()),
        }
    }

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit.max(1).into())
            .burst_size(config.rate_limit.max(1) * 2)
            .finish()
            .context("Failed to create rate limiter config")?,
    );

    let app = app(state, &config)?.layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", config.rate_limit);
    match config.process_timeout() {
        Some(limit) => info!("External tool timeout: {}s", limit.as_secs()),
        None => info!("External tool timeout: none"),
    }
    if config.origins().is_empty() {
        info!("CORS: all origins allowed");
    } else {
        info!("CORS: {}", config.origins().join(", "));
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
