//! Contract tests for the request builder: default headers, failure
//! classification, hook replacement and body capping.

use entitle_errors::http_status;
use entitle_http::{HttpClient, DEFAULT_ERROR_BODY_MAX};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> HttpClient {
    HttpClient::new(Duration::from_secs(5)).unwrap()
}

#[derive(Deserialize, Debug)]
struct RecvBody {
    recvfield: String,
}

#[tokio::test]
async fn json_round_trip_sets_default_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/roundtrip"))
        .and(header("Accept", "application/json"))
        .and(header("Accept-Charset", "utf-8"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"sendfield": "send1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"recvfield": "recv1"})))
        .expect(1)
        .mount(&server)
        .await;

    let received: RecvBody = test_client()
        .post(format!("{}/roundtrip", server.uri()))
        .send_json(&json!({"sendfield": "send1"}))
        .unwrap()
        .recv_json()
        .await
        .unwrap();
    assert_eq!(received.recvfield, "recv1");
}

#[tokio::test]
async fn text_round_trip_sets_text_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/text"))
        .and(header("Accept", "text/plain"))
        .and(header("Accept-Charset", "utf-8"))
        .and(header("Content-Type", "text/plain"))
        .and(body_string("input"))
        .respond_with(ResponseTemplate::new(200).set_body_string("output"))
        .expect(1)
        .mount(&server)
        .await;

    let received = test_client()
        .get(format!("{}/text", server.uri()))
        .send_text("input")
        .recv_text()
        .await
        .unwrap();
    assert_eq!(received, "output");
}

#[tokio::test]
async fn explicit_headers_win_over_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/custom"))
        .and(header("Accept", "application/vnd.entitle+json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    test_client()
        .get(format!("{}/custom", server.uri()))
        .header("Accept", "application/vnd.entitle+json")
        .execute()
        .await
        .unwrap();
}

#[tokio::test]
async fn default_check_passes_2xx() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("teststring"))
        .mount(&server)
        .await;

    let response = test_client()
        .get(format!("{}/ok", server.uri()))
        .execute()
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "teststring");
}

#[tokio::test]
async fn default_check_classifies_300_and_up() {
    for status in [300u16, 400, 500] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fail"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = test_client()
            .get(format!("{}/fail", server.uri()))
            .execute()
            .await
            .unwrap_err();
        assert_eq!(http_status(Some(&err)), (status, true));
        assert_eq!(
            err.fields().get("status_code").and_then(|v| v.as_u64()),
            Some(u64::from(status))
        );
    }
}

#[tokio::test]
async fn failure_carries_request_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/denied"))
        .respond_with(ResponseTemplate::new(403).set_body_string("not yours"))
        .mount(&server)
        .await;

    let url = format!("{}/denied", server.uri());
    let err = test_client()
        .put(&url)
        .send_text("payload")
        .execute()
        .await
        .unwrap_err();

    assert_eq!(err.fields().get("method").and_then(|v| v.as_str()), Some("PUT"));
    assert_eq!(
        err.fields().get("url").and_then(|v| v.as_str()),
        Some(url.as_str())
    );
    assert_eq!(
        err.fields().get("response_body").and_then(|v| v.as_str()),
        Some("not yours")
    );
    assert!(err.message().contains("unexpected status 403"));
    assert!(err.message().contains("not yours"));
}

#[tokio::test]
async fn custom_check_can_accept_other_statuses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(418).set_body_string("short and stout"))
        .mount(&server)
        .await;

    let response = test_client()
        .get(format!("{}/teapot", server.uri()))
        .error_check(|status| status != 418)
        .execute()
        .await
        .unwrap();
    assert_eq!(response.status, 418);
}

#[tokio::test]
async fn hooks_run_with_capped_body() {
    const CAP: usize = 1337;

    let server = MockServer::start().await;
    let big = "teststring".repeat(1024);
    assert!(big.len() > CAP);

    Mock::given(method("GET"))
        .and(path("/oversized"))
        .respond_with(ResponseTemplate::new(599).set_body_string(big))
        .mount(&server)
        .await;

    let check_called = Arc::new(AtomicBool::new(false));
    let summary_called = Arc::new(AtomicBool::new(false));
    let check_flag = check_called.clone();
    let summary_flag = summary_called.clone();

    let err = test_client()
        .get(format!("{}/oversized", server.uri()))
        .error_body_max(CAP)
        .error_check(move |status| {
            assert_eq!(status, 599);
            check_flag.store(true, Ordering::SeqCst);
            status >= 300
        })
        .error_summary(move |context| {
            assert_eq!(context.status, 599);
            assert!(context.body.len() <= CAP);
            summary_flag.store(true, Ordering::SeqCst);
            format!("oversized reply from {}", context.url)
        })
        .execute()
        .await
        .unwrap_err();

    assert!(check_called.load(Ordering::SeqCst));
    assert!(summary_called.load(Ordering::SeqCst));
    assert!(err.message().starts_with("oversized reply from"));
    let kept = err
        .fields()
        .get("response_body")
        .and_then(|v| v.as_str())
        .unwrap();
    assert_eq!(kept.len(), CAP);
}

#[tokio::test]
async fn default_cap_bounds_response_body_field() {
    let server = MockServer::start().await;
    let big = "teststring".repeat(32);
    assert!(big.len() > DEFAULT_ERROR_BODY_MAX);

    Mock::given(method("GET"))
        .and(path("/oversized"))
        .respond_with(ResponseTemplate::new(599).set_body_string(big))
        .mount(&server)
        .await;

    let err = test_client()
        .get(format!("{}/oversized", server.uri()))
        .execute()
        .await
        .unwrap_err();

    let kept = err
        .fields()
        .get("response_body")
        .and_then(|v| v.as_str())
        .unwrap();
    assert_eq!(kept.len(), DEFAULT_ERROR_BODY_MAX);
}

#[tokio::test]
async fn transport_failure_is_unclassified() {
    // nothing listens here; connection is refused without a server
    let client = HttpClient::new(Duration::from_secs(2)).unwrap();
    let err = client
        .get("http://127.0.0.1:9/unreachable")
        .execute()
        .await
        .unwrap_err();

    assert_eq!(http_status(Some(&err)), (500, false));
    assert!(err.message().contains("sending request"));
    assert_eq!(err.fields().get("method").and_then(|v| v.as_str()), Some("GET"));
    assert!(err.fields().contains_key("url"));

    let unwound = err.unwind();
    let foreign = unwound.cause.foreign().unwrap();
    assert!(foreign.downcast_ref::<reqwest::Error>().is_some());
}

#[tokio::test]
async fn malformed_url_is_a_plain_failure() {
    // never reaches the network; reqwest rejects the url at send time
    let err = test_client()
        .get("no scheme at all")
        .execute()
        .await
        .unwrap_err();

    assert_eq!(http_status(Some(&err)), (500, false));
    assert!(err.message().contains("sending request"));
    assert_eq!(
        err.fields().get("url").and_then(|v| v.as_str()),
        Some("no scheme at all")
    );

    let unwound = err.unwind();
    let foreign = unwound.cause.foreign().unwrap();
    assert!(foreign.downcast_ref::<reqwest::Error>().is_some());
}

#[tokio::test]
async fn recv_json_decode_failure_keeps_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client()
        .get(format!("{}/garbled", server.uri()))
        .recv_json::<RecvBody>()
        .await
        .unwrap_err();

    assert_eq!(http_status(Some(&err)), (500, false));
    assert!(err.message().contains("decoding response body"));
    assert_eq!(
        err.fields().get("status_code").and_then(|v| v.as_u64()),
        Some(200)
    );

    let unwound = err.unwind();
    let foreign = unwound.cause.foreign().unwrap();
    assert!(foreign.downcast_ref::<serde_json::Error>().is_some());
}
