//! Health and vocabulary routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/abbreviations", get(abbreviations))
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.config.mode,
        "noteVersion": state.documents.note_version(),
        "redact": state.config.redact,
    }))
}

/// GET /api/abbreviations — the table used when a request brings none.
async fn abbreviations(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "abbreviations": state.abbreviations,
        "count": state.abbreviations.len(),
    }))
}
