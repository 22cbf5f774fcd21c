//! Integration tests for the request executor.
//!
//! Exercises outcome classification against a mock HTTP server: success with
//! and without body capture, non-200 statuses, timeouts, connection failures
//! and header construction.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use bytes::Bytes;
use volley::{AttemptOutcome, Credential, ExecutorConfig, RequestExecutor};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn executor() -> RequestExecutor {
    RequestExecutor::with_defaults().expect("executor should build")
}

#[tokio::test]
async fn success_without_capture_skips_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ignored"))
        .mount(&server)
        .await;

    let outcome = executor()
        .execute(&Credential::new("tok"), &server.uri(), Bytes::new(), false)
        .await;

    assert_eq!(outcome, AttemptOutcome::Success(None));
}

#[tokio::test]
async fn success_with_capture_returns_full_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"profile-bytes".to_vec()))
        .mount(&server)
        .await;

    let outcome = executor()
        .execute(&Credential::new("tok"), &server.uri(), Bytes::new(), true)
        .await;

    assert_eq!(
        outcome,
        AttemptOutcome::Success(Some(Bytes::from_static(b"profile-bytes")))
    );
}

#[tokio::test]
async fn non_200_statuses_are_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let executor = executor();
    let cred = Credential::new("tok");

    let missing = executor
        .execute(&cred, &format!("{}/missing", server.uri()), Bytes::new(), true)
        .await;
    let broken = executor
        .execute(&cred, &format!("{}/broken", server.uri()), Bytes::new(), true)
        .await;

    assert_eq!(missing, AttemptOutcome::Failure);
    assert_eq!(broken, AttemptOutcome::Failure);
}

#[tokio::test]
async fn connection_failure_is_absorbed() {
    // Port 1 is never listening; the connect error must not propagate.
    let outcome = executor()
        .execute(&Credential::new("tok"), "http://127.0.0.1:1/", Bytes::new(), false)
        .await;

    assert_eq!(outcome, AttemptOutcome::Failure);
}

#[tokio::test]
async fn slow_response_times_out_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = ExecutorConfig { timeout: Duration::from_millis(100), ..Default::default() };
    let executor = RequestExecutor::new(config).expect("executor should build");

    let outcome = executor
        .execute(&Credential::new("tok"), &server.uri(), Bytes::new(), false)
        .await;

    assert_eq!(outcome, AttemptOutcome::Failure);
}

#[tokio::test]
async fn bearer_and_static_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer tok-123"))
        .and(header("content-type", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = executor()
        .execute(
            &Credential::new("tok-123"),
            &server.uri(),
            Bytes::from_static(b"payload"),
            false,
        )
        .await;

    assert!(outcome.is_success());
    server.verify().await;
}

#[tokio::test]
async fn request_body_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    executor()
        .execute(
            &Credential::new("tok"),
            &server.uri(),
            Bytes::from_static(b"opaque-payload"),
            false,
        )
        .await;

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, b"opaque-payload");
}
