//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with proxy and diagnostics handlers
//! - Wire up middleware (tracing, body limit, optional timeout, request ID)
//! - Apply backend origin updates from the config watcher
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::diagnostics::DiagnosticsLog;
use crate::gateway::{BackendGateway, GatewayError};
use crate::http::diagnostics::{append_diagnostic, list_diagnostics};
use crate::http::proxy::{create_client, delete_client, get_client, list_clients, replace_client};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: BackendGateway,
    pub diagnostics: Arc<DiagnosticsLog>,
}

impl AppState {
    /// Fresh state: gateway at the configured origin, empty diagnostics log.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            gateway: BackendGateway::new(&config.backend.base_url)?,
            diagnostics: Arc::new(DiagnosticsLog::new()),
        })
    }
}

/// HTTP server for the clients gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let state = AppState::from_config(&config)?;
        let router = build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// The fully layered router, e.g. for driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// `config_updates` carries reloaded configurations; only the backend
    /// origin is applied live. The server drains and returns once
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.state.gateway.origin(),
            "HTTP server starting"
        );

        let gateway = self.state.gateway.clone();
        tokio::spawn(async move {
            while let Some(update) = config_updates.recv().await {
                if let Err(e) = gateway.set_origin(&update.backend.base_url) {
                    tracing::error!(error = %e, "Ignoring reloaded backend origin");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
    let mut router = Router::new()
        .route("/api/clients", get(list_clients).post(create_client))
        .route(
            "/api/clients/{id}",
            get(get_client).put(replace_client).delete(delete_client),
        )
        .route(
            "/api/diagnostics",
            get(list_diagnostics).post(append_diagnostic),
        )
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes));

    if let Some(secs) = config.timeouts.request_secs {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
    }

    router
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}
