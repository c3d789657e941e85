//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use clients_gateway::config::GatewayConfig;
use clients_gateway::http::HttpServer;
use clients_gateway::lifecycle::Shutdown;

/// What the in-memory backend has seen and stored.
#[derive(Default)]
pub struct BackendState {
    pub records: Vec<Value>,
    pub next_id: u64,
    pub last_query: Option<String>,
    pub last_content_type: Option<String>,
}

pub type SharedBackend = Arc<Mutex<BackendState>>;

#[derive(Deserialize)]
struct PageParams {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    size: Option<usize>,
}

/// Start an in-memory client-records backend on an ephemeral port.
pub async fn start_records_backend() -> (SocketAddr, SharedBackend) {
    let shared = SharedBackend::default();
    let app = Router::new()
        .route("/api/clients", get(list).post(create))
        .route("/api/clients/{id}", get(fetch).put(replace).delete(remove))
        .with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, shared)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "client not found"}))).into_response()
}

fn normalized(body: &Value) -> Value {
    let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::trim);
    json!({
        "nom": text("nom").unwrap_or_default(),
        "prenom": text("prenom").unwrap_or_default(),
        "email": text("email"),
        "telephone": text("telephone"),
    })
}

async fn list(
    State(shared): State<SharedBackend>,
    RawQuery(raw): RawQuery,
    Query(params): Query<PageParams>,
) -> Json<Value> {
    let mut state = shared.lock().unwrap();
    state.last_query = raw;

    let needle = params.search.unwrap_or_default().to_lowercase();
    let matching: Vec<Value> = state
        .records
        .iter()
        .rev()
        .filter(|r| needle.is_empty() || r.to_string().to_lowercase().contains(&needle))
        .cloned()
        .collect();

    let page = params.page.unwrap_or(0);
    let size = params.size.unwrap_or(8).max(1);
    let content: Vec<Value> = matching.iter().skip(page * size).take(size).cloned().collect();

    Json(json!({
        "content": content,
        "totalElements": matching.len(),
        "totalPages": matching.len().div_ceil(size),
        "number": page,
        "size": size
    }))
}

async fn create(
    State(shared): State<SharedBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = shared.lock().unwrap();
    state.last_content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.next_id += 1;
    let mut record = normalized(&body);
    record["id"] = json!(format!("c{}", state.next_id));
    record["createdAt"] = json!(chrono::Utc::now().to_rfc3339());
    state.records.push(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

async fn fetch(State(shared): State<SharedBackend>, Path(id): Path<String>) -> Response {
    let state = shared.lock().unwrap();
    match state.records.iter().find(|r| r["id"] == id.as_str()) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn replace(
    State(shared): State<SharedBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = shared.lock().unwrap();
    let Some(record) = state.records.iter_mut().find(|r| r["id"] == id.as_str()) else {
        return not_found();
    };
    let update = normalized(&body);
    for key in ["nom", "prenom", "email", "telephone"] {
        record[key] = update[key].clone();
    }
    Json(record.clone()).into_response()
}

async fn remove(State(shared): State<SharedBackend>, Path(id): Path<String>) -> Response {
    let mut state = shared.lock().unwrap();
    let before = state.records.len();
    state.records.retain(|r| r["id"] != id.as_str());
    if state.records.len() == before {
        return not_found();
    }
    // Content type on an empty 204, which the gateway must strip.
    (StatusCode::NO_CONTENT, [("content-type", "application/json")]).into_response()
}

/// Start a programmable raw-TCP backend for exact control over the
/// response head. `f` gets the raw request head and returns the full
/// status line plus headers (without the trailing blank line) and a body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (String, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]).to_string();

                let (head_out, body) = f(head).await;
                let response = format!(
                    "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    head_out,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Running gateway plus the handle that stops it.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<GatewayConfig>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway forwarding to `backend`.
pub async fn start_gateway(backend: SocketAddr) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.backend.base_url = format!("http://{}", backend);
    config.listener.bind_address = "127.0.0.1:0".into();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestGateway {
        addr,
        shutdown,
        config_updates: tx,
    }
}

/// Client that never reuses connections, so each test request is fresh.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
