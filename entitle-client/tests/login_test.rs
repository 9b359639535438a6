//! Contract tests for login, including the raw reject body and status
//! classification through the error chain.

use entitle_client::{Client, Config};
use entitle_errors::http_status;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> Client {
    Client::new(Config::new(server.uri().parse().unwrap())).unwrap()
}

#[tokio::test]
async fn login_returns_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_json(json!({
            "username": "ada",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "jwt-abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).login("ada", "hunter2").await.unwrap();
    assert_eq!(result.token, "jwt-abc");
}

#[tokio::test]
async fn rejected_login_carries_raw_body_and_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "incorrect authentication credentials"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server).login("ada", "wrong").await.unwrap_err();

    // the reject status is visible through the source() chain
    assert_eq!(http_status(Some(&err)), (401, true));

    let raw = err.raw.as_ref().unwrap();
    assert_eq!(
        raw.detail.as_deref(),
        Some("incorrect authentication credentials")
    );

    let rendered = err.to_string();
    assert!(rendered.contains("login rejected: incorrect authentication credentials"));
    assert!(rendered.contains("(raw:"));

    // the embedded diagnostic error carries the op annotation
    assert_eq!(
        err.source.fields().get("op").and_then(|v| v.as_str()),
        Some("login")
    );
    assert_eq!(
        err.source.fields().get("username").and_then(|v| v.as_str()),
        Some("ada")
    );
}

#[tokio::test]
async fn rejected_login_parses_field_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "password": ["This password is too short."]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server).login("ada", "pw").await.unwrap_err();
    assert_eq!(http_status(Some(&err)), (400, true));
    assert!(err.source.message().contains("login rejected with status 400"));

    let raw = err.raw.as_ref().unwrap();
    assert!(raw.detail.is_none());
    assert_eq!(raw.password, vec!["This password is too short.".to_string()]);
}

#[tokio::test]
async fn empty_password_never_sends() {
    let server = MockServer::start().await;

    let err = test_client(&server).login("ada", "").await.unwrap_err();
    assert_eq!(http_status(Some(&err)), (400, true));
    assert!(err.raw.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_success_body_is_a_plain_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server).login("ada", "hunter2").await.unwrap_err();
    // a decode failure carries no deliberate status
    assert_eq!(http_status(Some(&err)), (500, false));
    assert!(err.raw.is_none());
    assert!(err.source.message().contains("decoding response body"));
}
