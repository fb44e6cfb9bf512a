//! PDF Tools Server
//!
//! Backend for the browser-based PDF tools. Most tools run entirely in the
//! browser; this server hosts the ones that need an external binary or a
//! server-side library:
//!
//! - Redaction (cover rectangles, rasterize with pdftoppm, rebuild from images)
//! - Protect / unlock / repair (qpdf)
//! - Format conversion (LibreOffice)
//! - Text extraction and OCR (pdf-extract, tesseract)
//!
//! Every request works in its own scratch directory; no state is shared
//! between requests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod binaries;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod process;
pub mod rasterizer;
pub mod workspace;


use binaries::{BinaryResolver, Tool};
use config::Config;
use error::ApiError;
use rasterizer::{Pdftoppm, Rasterizer};
use workspace::Workspace;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: BinaryResolver,
    pub rasterizer: Arc<dyn Rasterizer>,
    /// Parent of per-request workspaces (system temp dir when unset)
    pub temp_root: Option<PathBuf>,
    /// Limit applied to every external tool run
    pub process_timeout: Option<Duration>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            resolver: BinaryResolver::system(config.binary_overrides()),
            rasterizer: Arc::new(Pdftoppm),
            temp_root: config.temp_root.clone(),
            process_timeout: config.process_timeout(),
        }
    }

    /// Resolve a binary or fail with a "not installed" error
    pub fn require(&self, tool: Tool) -> Result<PathBuf, ApiError> {
        self.resolver
            .resolve(tool)
            .ok_or(ApiError::MissingDependency(tool))
    }

    /// Create this request's scratch directory on the blocking pool
    pub async fn workspace(&self) -> Result<Workspace, ApiError> {
        let root = self.temp_root.clone();
        let workspace =
            tokio::task::spawn_blocking(move || Workspace::create(root.as_deref())).await??;
        Ok(workspace)
    }
}

/// CORS policy: everything when the allow-list is empty, otherwise only
/// the listed origins
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Build the API router (without rate limiting, which needs peer addresses)
pub fn app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let cors = cors_layer(&config.origins())?;

    let router = Router::new()
        // Health check
        .route("/api/health", get(handlers::health::handle_health))
        // Redaction
        .route("/api/redact-pdf", post(handlers::redact::handle_redact))
        // qpdf tools
        .route("/api/protect-pdf", post(handlers::qpdf::handle_protect))
        .route("/api/unlock-pdf", post(handlers::qpdf::handle_unlock))
        .route("/api/repair-pdf", post(handlers::qpdf::handle_repair))
        // LibreOffice
        .route("/api/convert", post(handlers::convert::handle_convert))
        // Text
        .route("/api/pdf-to-text", post(handlers::text::handle_pdf_to_text))
        .route("/api/ocr", post(handlers::text::handle_ocr))
        // Apply middleware
        .layer(DefaultBodyLimit::max(config.body_limit()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(router)
}
