//! Proxy endpoints for the client-records resource.
//!
//! | Route | Upstream |
//! |---|---|
//! | `GET /api/clients?…` | `GET {backend}/api/clients?…` (query verbatim) |
//! | `POST /api/clients` | `POST {backend}/api/clients` |
//! | `GET /api/clients/{id}` | `GET {backend}/api/clients/{id}` |
//! | `PUT /api/clients/{id}` | `PUT {backend}/api/clients/{id}` |
//! | `DELETE /api/clients/{id}` | `DELETE {backend}/api/clients/{id}` |
//!
//! Handlers never validate; the proxy is transparent.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    response::Response,
};

use crate::gateway::{GatewayError, UpstreamRequest, UpstreamResponse};
use crate::http::request::RequestIdExt;
use crate::http::response::{relay, relay_delete};
use crate::http::server::AppState;
use crate::observability::metrics;

const CLIENTS: [&str; 2] = ["api", "clients"];

fn collection() -> Vec<String> {
    CLIENTS.iter().map(|s| s.to_string()).collect()
}

fn record(id: String) -> Vec<String> {
    let mut segments = collection();
    segments.push(id);
    segments
}

/// Forward one request, with logging and metrics around it.
async fn dispatch(
    state: &AppState,
    route: &'static str,
    headers: &HeaderMap,
    request: UpstreamRequest,
) -> Result<UpstreamResponse, GatewayError> {
    let start = Instant::now();
    let request_id = headers.request_id();
    let method = request.method.clone();

    match state.gateway.forward(request).await {
        Ok(upstream) => {
            tracing::info!(
                request_id = %request_id,
                route,
                method = %method,
                status = %upstream.status,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Proxied request"
            );
            metrics::record_request(route, method.as_str(), upstream.status.as_u16(), start);
            Ok(upstream)
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, route, method = %method, error = %e, "Backend unreachable");
            metrics::record_upstream_error(route);
            metrics::record_request(route, method.as_str(), StatusCode::BAD_GATEWAY.as_u16(), start);
            Err(e)
        }
    }
}

/// `GET /api/clients`
pub async fn list_clients(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let request = UpstreamRequest::new(Method::GET, collection()).with_query(query);
    dispatch(&state, "clients.list", &headers, request).await.map(relay)
}

/// `POST /api/clients`
pub async fn create_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let request = UpstreamRequest::new(Method::POST, collection())
        .with_body(headers.get(CONTENT_TYPE).cloned(), body);
    dispatch(&state, "clients.create", &headers, request).await.map(relay)
}

/// `GET /api/clients/{id}`
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let request = UpstreamRequest::new(Method::GET, record(id));
    dispatch(&state, "clients.get", &headers, request).await.map(relay)
}

/// `PUT /api/clients/{id}`
pub async fn replace_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let request = UpstreamRequest::new(Method::PUT, record(id))
        .with_body(headers.get(CONTENT_TYPE).cloned(), body);
    dispatch(&state, "clients.replace", &headers, request).await.map(relay)
}

/// `DELETE /api/clients/{id}`
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let request = UpstreamRequest::new(Method::DELETE, record(id));
    dispatch(&state, "clients.delete", &headers, request)
        .await
        .map(relay_delete)
}
