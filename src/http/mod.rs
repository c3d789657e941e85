//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → proxy.rs  ─→ gateway → external backend
//!       diagnostics.rs ─→ in-memory log
//!     → response.rs (relay, 204 rule) / error.rs (local failures)
//!     → Send to client
//! ```

pub mod diagnostics;
pub mod error;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
