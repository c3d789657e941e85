//! Mapping local failures onto HTTP responses.
//!
//! Upstream statuses are never rewritten here; only failures that happen on
//! this side of the boundary are turned into responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::diagnostics::DiagnosticsError;
use crate::gateway::GatewayError;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Upstream request failed");
        (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
    }
}

impl IntoResponse for DiagnosticsError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
