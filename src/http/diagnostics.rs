//! Diagnostics endpoints. Served locally, never proxied.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use crate::diagnostics::{DiagnosticEntry, DiagnosticsError, NewDiagnostic};
use crate::http::server::AppState;

/// `GET /api/diagnostics`
pub async fn list_diagnostics(State(state): State<AppState>) -> Json<Vec<DiagnosticEntry>> {
    Json(state.diagnostics.list())
}

/// `POST /api/diagnostics`
pub async fn append_diagnostic(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<DiagnosticEntry>), DiagnosticsError> {
    let new: NewDiagnostic = serde_json::from_slice(&body)
        .map_err(|e| DiagnosticsError::InvalidBody(e.to_string()))?;

    let entry = state.diagnostics.append(new)?;
    tracing::info!(id = entry.id, "Diagnostics entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}
