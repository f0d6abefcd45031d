//! Mock HTTP server tests for [`HttpBackend`].
//!
//! Uses [`wiremock`] to stand up a local chat server. Exercises the full
//! request/response path without a real backend.
//!
//! Coverage:
//! - Successful answer via `response`, and the `content` fallback
//! - Payload shape (coding_mode, triage context)
//! - 500 and 503 status mapping
//! - Body without an answer field
//! - Client-side timeout
//! - Health endpoint up / down

use std::time::Duration;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use maeum_llm::error::BackendError;
use maeum_llm::{ErrorContext, GenerationRequest, Generator, HttpBackend};
use maeum_types::config::BackendConfig;
use maeum_types::{ContextState, Phase};

fn backend_for(server: &MockServer) -> HttpBackend {
    let config = BackendConfig {
        base_url: server.uri(),
        timeout_secs: 1,
        ..BackendConfig::default()
    };
    HttpBackend::new(&config).unwrap()
}

fn silent_request() -> GenerationRequest {
    GenerationRequest::new("how do I read a file?", "be brief", 512)
}

// ── Successful generation ──────────────────────────────────────────────

#[tokio::test]
async fn generate_reads_response_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "message": "how do I read a file?",
            "coding_mode": true,
            "max_tokens": 512
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "response": "Use std::fs::read_to_string." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let answer = backend_for(&server).generate(&silent_request()).await.unwrap();
    assert_eq!(answer, "Use std::fs::read_to_string.");
}

#[tokio::test]
async fn generate_falls_back_to_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "content": "ok" })),
        )
        .mount(&server)
        .await;

    let answer = backend_for(&server).generate(&silent_request()).await.unwrap();
    assert_eq!(answer, "ok");
}

#[tokio::test]
async fn triage_context_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "context": { "phase": "STABILIZE", "tolerance": "LOW", "error_type": "TypeError" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": "cause" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = ErrorContext::new(ContextState::from_phase(Phase::Stabilize));
    ctx.error_type = Some("TypeError".into());
    let request = GenerationRequest::new("TypeError: x is undefined", "triage", 512)
        .with_context(ctx);

    let answer = backend_for(&server).generate(&request).await.unwrap();
    assert_eq!(answer, "cause");
}

// ── Error mapping ──────────────────────────────────────────────────────

#[tokio::test]
async fn server_error_maps_to_request_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .generate(&silent_request())
        .await
        .unwrap_err();
    match err {
        BackendError::RequestFailed(msg) => {
            assert!(msg.contains("500"), "got: {msg}");
            assert!(msg.contains("boom"), "got: {msg}");
        }
        other => panic!("expected RequestFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn service_unavailable_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .generate(&silent_request())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Unavailable(ref m) if m == "model loading"));
}

#[tokio::test]
async fn missing_answer_field_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .generate(&silent_request())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::InvalidResponse(_)));
}

#[tokio::test]
async fn malformed_json_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .generate(&silent_request())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::InvalidResponse(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "response": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .generate(&silent_request())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Timeout), "got: {err:?}");
}

// ── Health ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_ok() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server).health().await.unwrap();
}

#[tokio::test]
async fn health_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = backend_for(&server).health().await.unwrap_err();
    assert!(matches!(err, BackendError::Unavailable(_)));
}
