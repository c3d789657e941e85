//! In-memory diagnostics log, independent of the client-records domain.
//!
//! # Data Flow
//! ```text
//! POST /api/diagnostics
//!     → NewDiagnostic (symptome + response, both required)
//!     → log.rs (assign id, timestamp, store)
//!
//! GET /api/diagnostics
//!     → log.rs (snapshot, newest first)
//! ```

pub mod log;
pub mod types;

pub use log::DiagnosticsLog;
pub use types::{DiagnosticEntry, DiagnosticResponse, DiagnosticsError, NewDiagnostic};
