use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use cadence::{
    api::{create_router, AppState},
    config::AppConfig,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn app_with(max_sessions: usize) -> Router {
    let mut config = AppConfig::default();
    config.server.max_sessions = max_sessions;
    create_router(AppState::new(&config))
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request_builder = Request::builder().method(method).uri(uri);
    let request = if let Some(payload) = body {
        request_builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("failed to build json request")
    } else {
        request_builder
            .body(Body::empty())
            .expect("failed to build empty request")
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response is not json")
    };

    (status, body)
}

async fn create_session(app: &Router) -> String {
    let (status, body) = send_json(app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["snapshot"]["insufficient_data"], true);
    body["id"].as_str().expect("session id").to_string()
}

async fn record(app: &Router, id: &str, symbol: &str) -> (StatusCode, Value) {
    send_json(
        app,
        Method::POST,
        &format!("/api/sessions/{id}/outcomes"),
        Some(json!({ "symbol": symbol })),
    )
    .await
}

#[tokio::test]
async fn health_reports_open_sessions() {
    let app = app_with(8);
    create_session(&app).await;
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["open_sessions"], 1);
}

#[tokio::test]
async fn snapshot_fills_in_after_third_round() {
    let app = app_with(8);
    let id = create_session(&app).await;

    let (_, body) = record(&app, &id, "A").await;
    assert_eq!(body["insufficient_data"], true);
    let (_, body) = record(&app, &id, "b").await;
    assert_eq!(body["insufficient_data"], true);

    let (status, body) = record(&app, &id, "side_b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insufficient_data"], false);
    assert_eq!(body["prediction"]["symbol"], "SIDE_B");
    assert_eq!(body["prediction"]["rule"], "streak");
    assert_eq!(body["confidence"], 65);
    assert_eq!(body["recommendation"], "bet");
}

#[tokio::test]
async fn invalid_symbol_is_rejected_without_change() {
    let app = app_with(8);
    let id = create_session(&app).await;
    record(&app, &id, "T").await;

    let (status, body) = record(&app, &id, "Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid symbol"));

    let (status, view) = send_json(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let history = view["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["symbol"], "TIE");
}

#[tokio::test]
async fn sessions_do_not_share_history() {
    let app = app_with(8);
    let first = create_session(&app).await;
    let second = create_session(&app).await;
    for symbol in ["A", "A", "A", "A"] {
        record(&app, &first, symbol).await;
    }

    let (_, view) = send_json(&app, Method::GET, &format!("/api/sessions/{second}"), None).await;
    assert!(view["history"].as_array().unwrap().is_empty());
    assert_eq!(view["snapshot"]["insufficient_data"], true);

    let (_, view) = send_json(&app, Method::GET, &format!("/api/sessions/{first}"), None).await;
    assert_eq!(view["snapshot"]["prediction"]["symbol"], "SIDE_B");
}

#[tokio::test]
async fn undo_and_clear_recompute() {
    let app = app_with(8);
    let id = create_session(&app).await;
    for symbol in ["A", "B", "B"] {
        record(&app, &id, symbol).await;
    }

    let (status, body) = send_json(&app, Method::POST, &format!("/api/sessions/{id}/undo"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insufficient_data"], true);
    assert_eq!(body["history_len"], 2);

    let (status, body) = send_json(&app, Method::POST, &format!("/api/sessions/{id}/clear"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history_len"], 0);

    // undo on an empty session is a no-op
    let (status, body) = send_json(&app, Method::POST, &format!("/api/sessions/{id}/undo"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history_len"], 0);
}

#[tokio::test]
async fn unknown_and_deleted_sessions_are_404() {
    let app = app_with(8);
    let missing = Uuid::new_v4();
    let (status, _) = send_json(&app, Method::GET, &format!("/api/sessions/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create_session(&app).await;
    let (status, body) = send_json(&app, Method::DELETE, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = record(&app, &id, "A").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_store_returns_503() {
    let app = app_with(1);
    create_session(&app).await;
    let (status, body) = send_json(&app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("limit"));
}
