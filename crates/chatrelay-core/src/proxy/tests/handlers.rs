//! Router-level tests: axum-test drives the relay, wiremock stands in for the upstream.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use bytes::Bytes;
use chatrelay_types::{RelayConfig, UpstreamConfig};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{body_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::proxy::{build_router, AppState};

const UPSTREAM_PATH: &str = "/v1/chat/completions";
const FIXED_PAYLOAD: &str = concat!(
    r#"{"id":"chatcmpl-1","object":"chat.completion","#,
    r#""choices":[{"index":0,"message":{"role":"assistant","content":"Hello from mock!"}}]}"#
);

fn test_config(upstream_url: String) -> RelayConfig {
    RelayConfig {
        upstream: UpstreamConfig { url: upstream_url, ..UpstreamConfig::default() },
        model_mapping: HashMap::from([
            ("ggl-4".to_string(), "gpt-4-turbo".to_string()),
            ("gclaude-3-5-sonnet".to_string(), "claude-3-5-sonnet-20240620".to_string()),
        ]),
        ..RelayConfig::default()
    }
}

fn relay(config: RelayConfig) -> TestServer {
    let state = AppState::new(config).expect("failed to build state");
    TestServer::new(build_router(state)).expect("failed to start test server")
}

async fn relay_with_upstream() -> (TestServer, MockServer) {
    let upstream = MockServer::start().await;
    let server = relay(test_config(format!("{}{}", upstream.uri(), UPSTREAM_PATH)));
    (server, upstream)
}

async fn upstream_hits(upstream: &MockServer) -> usize {
    upstream.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

fn bearer() -> HeaderValue {
    HeaderValue::from_static("Bearer sk-test")
}

fn chat_body(model: Value) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": "Hi"}],
        "temperature": 0.2,
        "max_tokens": 64,
        "stream": false
    })
}

fn assert_cors(response: &axum_test::TestResponse) {
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_METHODS), "POST, OPTIONS");
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_HEADERS),
        "Content-Type, Authorization, Accept"
    );
}

// ===== Authorization =====

#[tokio::test]
async fn test_missing_authorization_is_401_without_upstream_call() {
    let (server, upstream) = relay_with_upstream().await;

    let response = server.post("/chat/completions").json(&chat_body(json!("ggl-4"))).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Missing or invalid Authorization header"})
    );
    assert_eq!(upstream_hits(&upstream).await, 0);
}

#[tokio::test]
async fn test_non_bearer_authorization_is_401() {
    let (server, upstream) = relay_with_upstream().await;

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "bearer sk-test", "Token sk-test"] {
        let response = server
            .post("/chat/completions")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static(value))
            .json(&chat_body(json!("ggl-4")))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "value: {value}");
    }
    assert_eq!(upstream_hits(&upstream).await, 0);
}

#[tokio::test]
async fn test_auth_checked_before_body() {
    let (server, _upstream) = relay_with_upstream().await;

    let response = server
        .post("/chat/completions")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{broken"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ===== Body validation =====

#[tokio::test]
async fn test_invalid_json_is_400_without_upstream_call() {
    let (server, upstream) = relay_with_upstream().await;

    let bodies: [&[u8]; 4] = [b"{not json", b"", b"[1, 2, 3]", b"\"model\""];
    for body in bodies {
        let response = server
            .post("/chat/completions")
            .add_header(header::AUTHORIZATION, bearer())
            .content_type("application/json")
            .bytes(Bytes::copy_from_slice(body))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({"error": "Invalid request body"}));
    }
    assert_eq!(upstream_hits(&upstream).await, 0);
}

#[tokio::test]
async fn test_oversized_body_without_auth_is_401() {
    let upstream = MockServer::start().await;
    let mut config = test_config(format!("{}{}", upstream.uri(), UPSTREAM_PATH));
    config.server.body_limit_bytes = 16;
    let server = relay(config);

    let response = server.post("/chat/completions").json(&chat_body(json!("ggl-4"))).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Missing or invalid Authorization header"})
    );
    assert_eq!(upstream_hits(&upstream).await, 0);
}

#[tokio::test]
async fn test_oversized_body_with_auth_is_413_json() {
    let upstream = MockServer::start().await;
    let mut config = test_config(format!("{}{}", upstream.uri(), UPSTREAM_PATH));
    config.server.body_limit_bytes = 16;
    let server = relay(config);

    let response = server
        .post("/chat/completions")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&chat_body(json!("ggl-4")))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json::<Value>(), json!({"error": "Request body too large"}));
    assert_cors(&response);
    assert_eq!(upstream_hits(&upstream).await, 0);
}

// ===== Forwarding =====

#[tokio::test]
async fn test_mapped_model_is_rewritten_and_payload_relayed() {
    let (server, upstream) = relay_with_upstream().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .and(header_eq("authorization", "Bearer sk-test"))
        .and(body_json(chat_body(json!("gpt-4-turbo"))))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXED_PAYLOAD, "application/json"))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = server
        .post("/chat/completions")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&chat_body(json!("ggl-4")))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "application/json");
    assert_eq!(response.text(), FIXED_PAYLOAD);
}

#[tokio::test]
async fn test_unmapped_non_string_and_absent_model_forwarded_unchanged() {
    let (server, upstream) = relay_with_upstream().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXED_PAYLOAD, "application/json"))
        .mount(&upstream)
        .await;

    let mut absent = chat_body(json!(null));
    absent.as_object_mut().expect("object").remove("model");
    let inputs =
        [chat_body(json!("gpt-3.5-turbo")), chat_body(json!(42)), chat_body(json!(null)), absent];

    for input in &inputs {
        let response = server
            .post("/chat/completions")
            .add_header(header::AUTHORIZATION, bearer())
            .json(input)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let received = upstream.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), inputs.len());
    for (request, input) in received.iter().zip(&inputs) {
        let forwarded: Value = request.body_json().expect("forwarded body is JSON");
        assert_eq!(&forwarded, input);
    }
}

#[tokio::test]
async fn test_number_spelling_survives_forwarding() {
    let (server, upstream) = relay_with_upstream().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXED_PAYLOAD, "application/json"))
        .mount(&upstream)
        .await;

    let inbound = r#"{"model":"ggl-4","seed":123456789012345678901234,"temperature":1e2}"#;
    let response = server
        .post("/chat/completions")
        .add_header(header::AUTHORIZATION, bearer())
        .content_type("application/json")
        .bytes(Bytes::from_static(inbound.as_bytes()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let received = upstream.received_requests().await.expect("recording enabled");
    let forwarded = String::from_utf8(received[0].body.clone()).expect("utf-8 body");
    assert_eq!(
        forwarded,
        r#"{"model":"gpt-4-turbo","seed":123456789012345678901234,"temperature":1e2}"#
    );
}

#[tokio::test]
async fn test_only_selected_headers_forwarded() {
    let (server, upstream) = relay_with_upstream().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXED_PAYLOAD, "application/json"))
        .mount(&upstream)
        .await;

    server
        .post("/chat/completions")
        .add_header(header::AUTHORIZATION, bearer())
        .add_header(header::ACCEPT, HeaderValue::from_static("text/event-stream"))
        .add_header(header::COOKIE, HeaderValue::from_static("session=secret"))
        .add_header(
            header::HeaderName::from_static("x-custom"),
            HeaderValue::from_static("dropped"),
        )
        .json(&chat_body(json!("ggl-4")))
        .await;

    let received = upstream.received_requests().await.expect("recording enabled");
    let forwarded = &received[0].headers;
    assert_eq!(forwarded[header::AUTHORIZATION], "Bearer sk-test");
    assert_eq!(forwarded[header::ACCEPT], "text/event-stream");
    assert_eq!(forwarded[header::CONTENT_TYPE], "application/json");
    assert!(forwarded.get(header::COOKIE).is_none());
    assert!(forwarded.get("x-custom").is_none());
}

#[tokio::test]
async fn test_upstream_error_status_relayed_as_200_with_raw_body() {
    let (server, upstream) = relay_with_upstream().await;
    let upstream_error = r#"{"error":{"message":"Rate limit reached","type":"rate_limit"}}"#;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_raw(upstream_error, "application/json"))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = server
        .post("/chat/completions")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&chat_body(json!("ggl-4")))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), upstream_error);
}

#[tokio::test]
async fn test_unreachable_upstream_is_500_with_message() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let server = relay(test_config(format!("http://127.0.0.1:{port}{UPSTREAM_PATH}")));

    let response = server
        .post("/chat/completions")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&chat_body(json!("ggl-4")))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    let message = body["error"].as_str().expect("error is a string");
    assert!(!message.is_empty());
    assert_cors(&response);
}

#[tokio::test]
async fn test_configured_timeout_bounds_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&upstream)
        .await;

    let mut config = test_config(format!("{}{}", upstream.uri(), UPSTREAM_PATH));
    config.upstream.request_timeout_secs = Some(1);
    let server = relay(config);

    let response = server
        .post("/chat/completions")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&chat_body(json!("ggl-4")))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(upstream_hits(&upstream).await, 1);
}

// ===== CORS & routing =====

#[tokio::test]
async fn test_options_on_any_path_is_204_with_cors() {
    let (server, upstream) = relay_with_upstream().await;

    for route in ["/chat/completions", "/anything/else", "/health"] {
        let response = server.method(Method::OPTIONS, route).await;

        assert_eq!(response.status_code(), StatusCode::NO_CONTENT, "route: {route}");
        assert!(response.as_bytes().is_empty());
        assert_cors(&response);
    }
    assert_eq!(upstream_hits(&upstream).await, 0);
}

#[tokio::test]
async fn test_cors_headers_on_error_and_success_responses() {
    let (server, upstream) = relay_with_upstream().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXED_PAYLOAD, "application/json"))
        .mount(&upstream)
        .await;

    let unauthorized = server.post("/chat/completions").json(&json!({})).await;
    assert_cors(&unauthorized);

    let ok = server
        .post("/chat/completions")
        .add_header(header::AUTHORIZATION, bearer())
        .json(&json!({}))
        .await;
    assert_eq!(ok.status_code(), StatusCode::OK);
    assert_cors(&ok);
}

#[tokio::test]
async fn test_health_and_fallback() {
    let (server, _upstream) = relay_with_upstream().await;

    let health = server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<Value>(), json!({"status": "ok"}));

    let missing = server.get("/v1/models").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_cors(&missing);
}

#[tokio::test]
async fn test_get_on_chat_route_not_allowed() {
    let (server, upstream) = relay_with_upstream().await;

    let response = server.get("/chat/completions").await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(upstream_hits(&upstream).await, 0);
}
