//! Contract tests for account operations against a mock entitlement
//! service.

use entitle_client::{Account, Client, Config};
use entitle_errors::http_status;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> Client {
    let config = Config::new(server.uri().parse().unwrap())
        .with_token("test-token")
        .with_timeout(5);
    Client::new(config).unwrap()
}

fn account_fixture() -> Account {
    Account {
        id: "acct-100".into(),
        name: "Initech".into(),
        email: "buyer@initech.example".into(),
        created_at: None,
    }
}

#[tokio::test]
async fn create_account_round_trips() {
    let server = MockServer::start().await;
    let account = account_fixture();

    Mock::given(method("PUT"))
        .and(path("/api/v1/accounts/acct-100"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&account))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "acct-100",
            "name": "Initech",
            "email": "buyer@initech.example",
            "created_at": "2026-02-01T09:30:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stored = test_client(&server).create_account(&account).await.unwrap();
    assert_eq!(stored.id, "acct-100");
    assert_eq!(stored.name, "Initech");
    assert!(stored.created_at.is_some());
}

#[tokio::test]
async fn get_account_returns_account() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/acct-100"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "acct-100",
            "name": "Initech",
            "email": "buyer@initech.example"
        })))
        .mount(&server)
        .await;

    let account = test_client(&server).get_account("acct-100").await.unwrap();
    assert_eq!(account.email, "buyer@initech.example");
    assert!(account.created_at.is_none());
}

#[tokio::test]
async fn get_account_missing_classifies_as_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such account"))
        .mount(&server)
        .await;

    let err = test_client(&server).get_account("ghost").await.unwrap_err();

    assert_eq!(http_status(Some(&err)), (404, true));
    assert!(err.message().contains("unexpected status 404"));
    assert_eq!(
        err.fields().get("op").and_then(|v| v.as_str()),
        Some("get_account")
    );

    // one operation wrap over the transport-level base record
    let json = serde_json::to_value(err.unwind().to_report()).unwrap();
    assert_eq!(json["wraps"].as_array().unwrap().len(), 1);
    assert_eq!(json["wraps"][0]["fields"]["account_id"], "ghost");
    assert_eq!(json["cause"]["fields"]["status_code"], 404);
    assert_eq!(json["cause"]["fields"]["response_body"], "no such account");
}

#[tokio::test]
async fn create_account_rejects_bad_input_before_sending() {
    let server = MockServer::start().await;

    let account = Account {
        id: "acct-100".into(),
        name: String::new(),
        email: "not-an-email".into(),
        created_at: None,
    };
    let err = test_client(&server)
        .create_account(&account)
        .await
        .unwrap_err();

    assert_eq!(http_status(Some(&err)), (400, true));
    assert!(err.message().contains("email"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_account_rejects_unsafe_id_before_sending() {
    let server = MockServer::start().await;

    let err = test_client(&server)
        .get_account("../../etc/passwd")
        .await
        .unwrap_err();

    assert_eq!(http_status(Some(&err)), (400, true));
    assert!(server.received_requests().await.unwrap().is_empty());
}
