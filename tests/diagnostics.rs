//! Diagnostics endpoints, driven through the full router.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use clients_gateway::config::GatewayConfig;
use clients_gateway::http::HttpServer;

fn router() -> Router {
    HttpServer::new(GatewayConfig::default()).unwrap().router()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post(body: &str) -> Request<Body> {
    Request::post("/api/diagnostics")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn list() -> Request<Body> {
    Request::get("/api/diagnostics").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_empty_log_lists_nothing() {
    let (status, body) = send(&router(), list()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_append_then_list_newest_first() {
    let app = router();

    let (status, first) = send(
        &app,
        post(r#"{"symptome":"slow list","response":{"status":"ok","details":"added index"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["id"], 1);
    assert_eq!(first["symptome"], "slow list");
    assert_eq!(first["response"], json!({"status": "ok", "details": "added index"}));
    assert!(first["createdAt"].is_string());

    let (status, second) = send(
        &app,
        post(r#"{"symptome":"save fails","response":{"status":"ko","details":""}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["id"], 2);

    let (_, listed) = send(&app, list()).await;
    let ids: Vec<u64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let app = router();

    for body in [
        r#"{}"#,
        r#"{"symptome":"only a symptom"}"#,
        r#"{"response":{"status":"ok","details":"x"}}"#,
        r#"{"symptome":"","response":{"status":"ok","details":"x"}}"#,
        r#"{"symptome":"null response","response":null}"#,
    ] {
        let (status, json) = send(&app, post(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error"], "symptome and response are required");
    }

    let (_, listed) = send(&app, list()).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_blank_but_present_values_accepted() {
    let app = router();

    let (status, entry) = send(&app, post(r#"{"symptome":"   ","response":{}}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["symptome"], "   ");
    assert_eq!(entry["response"], json!({"status": "", "details": ""}));
}

#[tokio::test]
async fn test_non_object_response_rejected() {
    let (status, json) = send(&router(), post(r#"{"symptome":"s","response":"ok"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("invalid JSON body"));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let (status, json) = send(&router(), post("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("invalid JSON body"));
}

#[tokio::test]
async fn test_logs_are_per_process_state() {
    let a = router();
    let b = router();

    send(
        &a,
        post(r#"{"symptome":"only in a","response":{"status":"ok","details":""}}"#),
    )
    .await;

    let (_, listed) = send(&b, list()).await;
    assert_eq!(listed, json!([]));
}
