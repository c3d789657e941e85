//! Outbound HTTP calls to the external client-records service.
//!
//! # Responsibilities
//! - Resolve a resource path against the configured backend origin
//! - Forward method, query string, content-type and body
//! - Hand back status, content-type and raw body untouched
//!
//! No retries and no timeout beyond the transport defaults.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Bytes;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode};
use thiserror::Error;
use url::Url;

/// Content type assumed whenever one side omits it.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The configured origin cannot be used as a base URL.
    #[error("invalid backend origin `{0}`")]
    InvalidOrigin(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection refused, reset, DNS failure, body read failure...
    #[error("upstream request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A request to forward upstream.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    /// Path segments, resolved from the origin root. Segments are
    /// percent-encoded individually.
    pub segments: Vec<String>,
    /// Already-encoded query string, without the leading `?`.
    pub query: Option<String>,
    pub content_type: Option<HeaderValue>,
    pub body: Option<Bytes>,
}

impl UpstreamRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: None,
            content_type: None,
            body: None,
        }
    }

    /// Attach the inbound query string. Empty strings are dropped.
    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    /// Attach a body and the inbound content type (if any).
    pub fn with_body(mut self, content_type: Option<HeaderValue>, body: Bytes) -> Self {
        self.content_type = content_type;
        self.body = Some(body);
        self
    }
}

/// What came back from the backend.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Client for the external client-records service.
///
/// Cheap to clone; clones share the HTTP connection pool and the origin.
#[derive(Debug, Clone)]
pub struct BackendGateway {
    http: reqwest::Client,
    origin: Arc<ArcSwap<Url>>,
}

impl BackendGateway {
    /// Create a gateway pointing at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(GatewayError::Client)?;
        Ok(Self {
            http,
            origin: Arc::new(ArcSwap::from_pointee(parse_origin(base_url)?)),
        })
    }

    /// Current backend origin.
    pub fn origin(&self) -> Arc<Url> {
        self.origin.load_full()
    }

    /// Atomically point the gateway at a new origin.
    ///
    /// Requests already in flight keep the origin they resolved against.
    pub fn set_origin(&self, base_url: &str) -> Result<(), GatewayError> {
        let origin = parse_origin(base_url)?;
        if *self.origin.load_full() != origin {
            tracing::info!(origin = %origin, "Backend origin updated");
            self.origin.store(Arc::new(origin));
        }
        Ok(())
    }

    /// Build the absolute upstream URL for a request.
    pub fn resolve(&self, segments: &[String], query: Option<&str>) -> Result<Url, GatewayError> {
        let origin = self.origin.load_full();
        let mut url = Url::clone(&origin);
        url.set_fragment(None);
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidOrigin(origin.to_string()))?
            .clear()
            .extend(segments);
        url.set_query(query);
        Ok(url)
    }

    /// Forward a request and return the raw upstream response.
    pub async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, GatewayError> {
        let url = self.resolve(&request.segments, request.query.as_deref())?;

        tracing::debug!(method = %request.method, upstream = %url, "Forwarding to backend");

        let mut builder = self.http.request(request.method, url.clone());
        if let Some(body) = request.body {
            let content_type = request
                .content_type
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
            builder = builder.header(CONTENT_TYPE, content_type).body(body);
        }

        let transport = |source| GatewayError::Transport {
            url: url.to_string(),
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(transport)?;

        tracing::debug!(upstream = %url, status = %status, bytes = body.len(), "Backend responded");

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

fn parse_origin(base_url: &str) -> Result<Url, GatewayError> {
    let url = Url::parse(base_url).map_err(|_| GatewayError::InvalidOrigin(base_url.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(GatewayError::InvalidOrigin(base_url.to_string()));
    }
    Ok(url)
}
