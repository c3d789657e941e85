//! Diagnostics entry types and errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured outcome attached to a symptom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: String,
}

impl DiagnosticResponse {
    pub fn new(status: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            details: details.into(),
        }
    }
}

/// Body accepted by `POST /api/diagnostics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDiagnostic {
    #[serde(default)]
    pub symptome: Option<String>,
    #[serde(default)]
    pub response: Option<DiagnosticResponse>,
}

/// A stored diagnostics entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticEntry {
    pub id: u64,
    pub symptome: String,
    pub response: DiagnosticResponse,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagnosticsError {
    #[error("symptome and response are required")]
    MissingField,

    #[error("invalid JSON body: {0}")]
    InvalidBody(String),
}
