//! `GET /api/health`

use axum::{extract::State, Json};
use serde::Serialize;

use crate::binaries::Tool;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub binaries: BinaryStatus,
}

/// Which external binaries this host can run
#[derive(Debug, Serialize)]
pub struct BinaryStatus {
    pub qpdf: bool,
    pub libreoffice: bool,
    pub pdftoppm: bool,
}

/// Handler: GET /api/health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let resolver = &state.resolver;

    Json(HealthResponse {
        ok: true,
        binaries: BinaryStatus {
            qpdf: resolver.is_available(Tool::Qpdf),
            libreoffice: resolver.is_available(Tool::LibreOffice),
            pdftoppm: resolver.is_available(Tool::Pdftoppm),
        },
    })
}
