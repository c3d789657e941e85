//! Backend gateway subsystem.
//!
//! # Data Flow
//! ```text
//! proxy handler
//!     → UpstreamRequest (method, path segments, raw query, content-type, body)
//!     → client.rs (resolve against origin, send)
//!     → UpstreamResponse (status, content-type, raw body)
//!     → back to the handler for relaying
//! ```

pub mod client;

pub use client::{
    BackendGateway, GatewayError, UpstreamRequest, UpstreamResponse, DEFAULT_CONTENT_TYPE,
};
