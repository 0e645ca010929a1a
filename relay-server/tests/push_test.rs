//! End-to-end tests for the push endpoint.
//!
//! Drives the full router with in-memory requests against a recording
//! sink, covering routing, severity selection, and error scoping.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use tower::ServiceExt;
use url::Url;

use logrelay::logsink::{LogEntry, LogSink, Severity, SinkError};
use logrelay::web::{router, AppState};
use logrelay::Config;

/// In-memory sink recording every append and flush.
#[derive(Clone, Default)]
struct RecordingSink {
    appended: Arc<Mutex<Vec<(String, LogEntry)>>>,
    flushed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl LogSink for RecordingSink {
    async fn append(&self, stream: &str, entry: LogEntry) -> Result<(), SinkError> {
        self.appended
            .lock()
            .unwrap()
            .push((stream.to_string(), entry));
        Ok(())
    }

    async fn flush(&self, stream: &str) -> Result<(), SinkError> {
        self.flushed.lock().unwrap().push(stream.to_string());
        Ok(())
    }

    async fn flush_all(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink whose flush always fails, for backend-failure tests.
#[derive(Clone, Default)]
struct FailingFlushSink {
    appended: Arc<Mutex<Vec<(String, LogEntry)>>>,
}

#[async_trait]
impl LogSink for FailingFlushSink {
    async fn append(&self, stream: &str, entry: LogEntry) -> Result<(), SinkError> {
        self.appended
            .lock()
            .unwrap()
            .push((stream.to_string(), entry));
        Ok(())
    }

    async fn flush(&self, _stream: &str) -> Result<(), SinkError> {
        Err(SinkError::Backend(StatusCode::SERVICE_UNAVAILABLE))
    }

    async fn flush_all(&self) -> Result<(), SinkError> {
        Err(SinkError::Backend(StatusCode::SERVICE_UNAVAILABLE))
    }
}

/// Sink whose append always fails, recording flush calls.
#[derive(Clone, Default)]
struct FailingAppendSink {
    flushed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl LogSink for FailingAppendSink {
    async fn append(&self, _stream: &str, _entry: LogEntry) -> Result<(), SinkError> {
        Err(SinkError::Backend(StatusCode::SERVICE_UNAVAILABLE))
    }

    async fn flush(&self, stream: &str) -> Result<(), SinkError> {
        self.flushed.lock().unwrap().push(stream.to_string());
        Ok(())
    }

    async fn flush_all(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        project_id: "demo".to_string(),
        port: 0,
        log_endpoint: Url::parse("http://localhost:9999").unwrap(),
        log_api_token: None,
        request_timeout_ms: 1000,
    }
}

fn test_app(sink: Arc<dyn LogSink>) -> Router {
    router(AppState::new(test_config(), sink))
}

/// Build a push envelope body carrying the given inner payload.
fn envelope_body(payload: &Value) -> String {
    let data = STANDARD.encode(payload.to_string());
    json!({
        "message": { "data": data, "id": "msg-1" },
        "subscription": "projects/demo/subscriptions/push"
    })
    .to_string()
}

fn push_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec()
}

#[tokio::test]
async fn push_with_log_name_routes_to_named_stream() {
    let sink = RecordingSink::default();
    let app = test_app(Arc::new(sink.clone()));

    let response = app
        .oneshot(push_request(envelope_body(&json!({"log_name": "billing"}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    let appended = sink.appended.lock().unwrap();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].0, "demo_billing");
    assert_eq!(appended[0].1.severity, Severity::Info);

    let flushed = sink.flushed.lock().unwrap();
    assert_eq!(flushed.as_slice(), ["demo_billing"]);
}

#[tokio::test]
async fn push_without_log_name_routes_to_default_stream() {
    for payload in [
        json!({"event": "signup"}),
        json!({"log_name": ""}),
        json!({"log_name": null}),
        json!({"log_name": 7}),
    ] {
        let sink = RecordingSink::default();
        let app = test_app(Arc::new(sink.clone()));

        let response = app
            .oneshot(push_request(envelope_body(&payload)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let appended = sink.appended.lock().unwrap();
        assert_eq!(appended.len(), 1, "payload: {}", payload);
        assert_eq!(appended[0].0, "demo_general_log");
        assert_eq!(appended[0].1.severity, Severity::Info);
    }
}

#[tokio::test]
async fn push_with_error_log_name_selects_error_severity() {
    let sink = RecordingSink::default();
    let app = test_app(Arc::new(sink.clone()));

    let response = app
        .oneshot(push_request(envelope_body(&json!({"log_name": "ErrorQueue"}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let appended = sink.appended.lock().unwrap();
    assert_eq!(appended[0].0, "demo_ErrorQueue");
    assert_eq!(appended[0].1.severity, Severity::Error);
}

#[tokio::test]
async fn push_forwards_full_payload_including_log_name() {
    let sink = RecordingSink::default();
    let app = test_app(Arc::new(sink.clone()));

    let payload = json!({"log_name": "billing", "amount": 42, "user": "alice"});
    let response = app
        .oneshot(push_request(envelope_body(&payload)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let appended = sink.appended.lock().unwrap();
    assert_eq!(appended[0].1.payload, payload);
}

#[tokio::test]
async fn malformed_envelope_answers_400_without_logging() {
    let sink = RecordingSink::default();
    let app = test_app(Arc::new(sink.clone()));

    let response = app
        .oneshot(push_request("{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(sink.appended.lock().unwrap().is_empty());
    assert!(sink.flushed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn envelope_missing_message_answers_400() {
    let sink = RecordingSink::default();
    let app = test_app(Arc::new(sink.clone()));

    let response = app
        .oneshot(push_request(r#"{"subscription":"s"}"#.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(sink.appended.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_payload_answers_400_and_service_keeps_serving() {
    let sink = RecordingSink::default();
    let app = test_app(Arc::new(sink.clone()));

    // Inner data decodes from base64 but is not JSON.
    let body = json!({
        "message": { "data": STANDARD.encode("not json at all"), "id": "msg-1" },
        "subscription": "projects/demo/subscriptions/push"
    })
    .to_string();

    let response = app.clone().oneshot(push_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(sink.appended.lock().unwrap().is_empty());

    // The failure is scoped to one request; the next delivery succeeds.
    let response = app
        .oneshot(push_request(envelope_body(&json!({"log_name": "billing"}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sink.appended.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn backend_failure_answers_500_for_that_request_only() {
    let sink = FailingFlushSink::default();
    let app = test_app(Arc::new(sink.clone()));

    let response = app
        .clone()
        .oneshot(push_request(envelope_body(&json!({"log_name": "billing"}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The entry was still appended before the flush failed.
    assert_eq!(sink.appended.lock().unwrap().len(), 1);

    // The router itself keeps serving.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn append_failure_still_flushes_stream_and_answers_500() {
    let sink = FailingAppendSink::default();
    let app = test_app(Arc::new(sink.clone()));

    let response = app
        .oneshot(push_request(envelope_body(&json!({"log_name": "billing"}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The stream is flushed even though the append failed, so nothing
    // stays buffered past the request.
    assert_eq!(sink.flushed.lock().unwrap().as_slice(), ["demo_billing"]);
}

#[tokio::test]
async fn health_returns_ok() {
    let sink = RecordingSink::default();
    let app = test_app(Arc::new(sink));

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_bytes(response).await;
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["status"], "ok");
}
