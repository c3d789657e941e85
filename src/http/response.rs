//! Relaying backend responses to the caller.
//!
//! Status and body pass through untouched. A missing upstream content type
//! becomes `application/json`, except for an empty 204 on DELETE, which goes
//! out with no body and no content type at all.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::gateway::{UpstreamResponse, DEFAULT_CONTENT_TYPE};

/// Relay an upstream response verbatim.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    (
        upstream.status,
        [(CONTENT_TYPE, content_type)],
        Body::from(upstream.body),
    )
        .into_response()
}

/// Relay the response to a DELETE.
pub fn relay_delete(upstream: UpstreamResponse) -> Response {
    if upstream.status == StatusCode::NO_CONTENT {
        return StatusCode::NO_CONTENT.into_response();
    }
    relay(upstream)
}
