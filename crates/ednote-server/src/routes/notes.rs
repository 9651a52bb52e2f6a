//! Note formatting, SOAP conversion and text export routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, error, warn};

use ednote_core::{AbbreviationTable, Error, SegmentMode, StructuredNote};
use ednote_ingest::Normalizer;
use ednote_protocol::RedactedEntity;
use ednote_soap::{render_document, render_note};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/format", post(format_note))
        .route("/soap", post(soap_document))
        .route("/export/text", post(export_text))
}

// ---------------------------------------------------------------
// Request types
// ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NoteRequest {
    #[serde(default)]
    text: String,
    mode: Option<String>,
    /// A `{term: short}` object, or a string holding that JSON (file content).
    abbreviations: Option<serde_json::Value>,
    redact: Option<bool>,
    /// Export only: render the SOAP document instead of the section list.
    #[serde(default)]
    soap: bool,
}

/// A formatted note plus everything the response reports about how it was made.
struct Formatted {
    note: StructuredNote,
    abbreviation_fallback: Option<String>,
    redacted: Option<Vec<RedactedEntity>>,
}

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

fn resolve_abbreviations(value: &serde_json::Value) -> (AbbreviationTable, Option<Error>) {
    let parsed = match value {
        serde_json::Value::String(source) => AbbreviationTable::from_json(source),
        other => AbbreviationTable::from_json_value(other),
    };
    match parsed {
        Ok(table) => (table, None),
        Err(e) => {
            warn!("Request abbreviations rejected, using defaults: {}", e);
            (AbbreviationTable::default(), Some(e))
        }
    }
}

fn run_pipeline(state: &AppState, req: &NoteRequest) -> Result<Formatted, ErrorResponse> {
    let mode = match req.mode.as_deref() {
        Some(m) => m
            .parse::<SegmentMode>()
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))?,
        None => state.config.mode,
    };

    let mut abbreviation_fallback = None;
    let custom;
    let normalizer = match &req.abbreviations {
        Some(value) => {
            let (table, err) = resolve_abbreviations(value);
            abbreviation_fallback = err.map(|e| e.to_string());
            custom = Normalizer::new(&table);
            &custom
        }
        None => &state.normalizer,
    };

    let redaction = if req.redact.unwrap_or(state.config.redact) {
        Some(state.redactor.redact_with_report(&req.text))
    } else {
        None
    };
    let text = redaction.as_ref().map_or(req.text.as_str(), |r| r.text.as_str());

    match state.formatter.format_with(text, normalizer, mode) {
        Ok(note) => {
            debug!("Formatted {} chars in {} mode", req.text.len(), mode);
            Ok(Formatted {
                note,
                abbreviation_fallback,
                redacted: redaction.map(|r| r.entities),
            })
        }
        Err(Error::EmptyInput) => Err(error_response(
            StatusCode::BAD_REQUEST,
            Error::EmptyInput.to_string(),
        )),
        Err(e) => {
            error!("Formatting failed: {}", e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Attach the optional report fields shared by the JSON responses.
fn with_report(mut body: serde_json::Value, formatted: &Formatted) -> serde_json::Value {
    if let Some(fallback) = &formatted.abbreviation_fallback {
        body["abbreviationFallback"] = serde_json::json!(fallback);
    }
    if let Some(entities) = &formatted.redacted {
        body["redactions"] = serde_json::json!(entities);
    }
    body
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// POST /api/format — section-labeled note.
async fn format_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NoteRequest>,
) -> Response {
    let formatted = match run_pipeline(&state, &req) {
        Ok(f) => f,
        Err(e) => return e.into_response(),
    };
    let body = serde_json::json!({
        "note": formatted.note,
        "warnings": formatted.note.warnings(),
    });
    (StatusCode::OK, Json(with_report(body, &formatted))).into_response()
}

/// POST /api/soap — SOAP document with metadata.
async fn soap_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NoteRequest>,
) -> Response {
    let formatted = match run_pipeline(&state, &req) {
        Ok(f) => f,
        Err(e) => return e.into_response(),
    };
    let document = state.documents.build(&formatted.note, &*state.clock);
    let body = serde_json::json!({
        "document": document,
        "warnings": formatted.note.warnings(),
    });
    (StatusCode::OK, Json(with_report(body, &formatted))).into_response()
}

/// POST /api/export/text — plain-text rendering.
async fn export_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NoteRequest>,
) -> Response {
    let formatted = match run_pipeline(&state, &req) {
        Ok(f) => f,
        Err(e) => return e.into_response(),
    };
    let text = if req.soap {
        render_document(&state.documents.build(&formatted.note, &*state.clock))
    } else {
        render_note(&formatted.note)
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response()
}
