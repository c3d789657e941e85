//! Configuration validation.
//!
//! Serde handles the syntax; this module checks values that deserialize fine
//! but cannot work at runtime. All errors are collected, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a [`GatewayConfig`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("backend.base_url `{0}` is not a valid URL")]
    InvalidBackendUrl(String),

    #[error("backend.base_url must use http or https, got `{0}`")]
    UnsupportedScheme(String),

    #[error("backend.base_url `{0}` has no host")]
    MissingHost(String),

    #[error("{field} `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("timeouts.request_secs must be greater than zero when set")]
    ZeroTimeout,
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base_url = &config.backend.base_url;
    match Url::parse(base_url) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
            if url.host_str().is_none() {
                errors.push(ValidationError::MissingHost(base_url.clone()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidBackendUrl(base_url.clone())),
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
