//! Clients gateway
//!
//! Serves the `/api/clients` proxy and the in-memory diagnostics log.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                CLIENTS GATEWAY                │
//!                     │                                               │
//!   View / CLI        │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!   ──────────────────┼─▶│  http   │───▶│  proxy   │───▶│ gateway  │──┼──▶ Backend
//!                     │  │ server  │    │ handlers │    │  client  │  │    service
//!                     │  └────┬────┘    └──────────┘    └──────────┘  │
//!                     │       │                                       │
//!                     │       ▼                                       │
//!                     │  ┌─────────────┐                              │
//!                     │  │ diagnostics │  (process lifetime only)     │
//!                     │  │     log     │                              │
//!                     │  └─────────────┘                              │
//!                     │                                               │
//!                     │  config · observability · lifecycle           │
//!                     └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use clients_gateway::config::watcher::ConfigWatcher;
use clients_gateway::config::{load_config, load_from_env};
use clients_gateway::http::HttpServer;
use clients_gateway::lifecycle::{signals, Shutdown};
use clients_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "clients-gateway")]
#[command(about = "Proxy for the client-records backend", long_about = None)]
struct Args {
    /// TOML configuration file, watched for backend origin changes.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };

    logging::init_logging(&config.observability);
    tracing::info!("clients-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        max_body_bytes = config.limits.max_body_bytes,
        request_timeout_secs = ?config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Dropping the watcher stops reloads, so it lives as long as main.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
