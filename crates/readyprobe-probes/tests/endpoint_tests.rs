//! Endpoint health probe integration tests
//!
//! Real HTTP through reqwest against wiremock servers, plus scripted
//! clients on a paused clock for timing.

mod common;

use common::*;
use readyprobe_core::types::{Expectation, Observed, RetryPolicy};
use readyprobe_probes::{
    check_endpoint_healthy, EndpointHealthProbe, HttpClientOptions, ReqwestHttpClient,
    TransportError,
};
use std::time::Duration;
use wiremock::MockServer;

fn client() -> ReqwestHttpClient {
    ReqwestHttpClient::new(&HttpClientOptions::default()).unwrap()
}

#[tokio::test]
async fn test_always_unhealthy_makes_final_attempt() {
    let server = MockServer::start().await;
    mock_status(&server, "/health", 503).await;

    let outcome = check_endpoint_healthy(
        &client(),
        &url_for(&server, "/health"),
        Some(3),
        Some(TEST_DELAY),
        None,
    )
    .await
    .unwrap();

    assert!(!outcome.succeeded());
    assert_eq!(outcome.expected(), &Expectation::Status(200));
    assert_eq!(outcome.actual(), &Observed::Status(503));
    assert_eq!(outcome.attempts_made(), 4);
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn test_recovers_mid_budget() {
    let server = MockServer::start().await;
    mock_flaky(&server, "/health", 503, 2, 200).await;

    let outcome = check_endpoint_healthy(
        &client(),
        &url_for(&server, "/health"),
        Some(5),
        Some(TEST_DELAY),
        None,
    )
    .await
    .unwrap();

    assert!(outcome.succeeded());
    assert_eq!(outcome.actual(), &Observed::Status(200));
    assert_eq!(outcome.attempts_made(), 3);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_healthy_on_first_request() {
    let server = MockServer::start().await;
    mock_status(&server, "/", 200).await;

    let outcome = check_endpoint_healthy(&client(), &url_for(&server, "/"), Some(3), Some(TEST_DELAY), None)
        .await
        .unwrap();

    assert!(outcome.succeeded());
    assert_eq!(outcome.attempts_made(), 1);
    assert_eq!(request_count(&server).await, 1);
    assert!(outcome.ensure_succeeded().is_ok());
}

#[tokio::test]
async fn test_redirect_observed_literally() {
    let server = MockServer::start().await;
    mock_redirect(&server, "/old", 302, "/new").await;
    mock_status(&server, "/new", 200).await;

    let outcome = check_endpoint_healthy(&client(), &url_for(&server, "/old"), Some(1), Some(TEST_DELAY), None)
        .await
        .unwrap();

    assert!(!outcome.succeeded());
    assert_eq!(outcome.actual(), &Observed::Status(302));
    assert_eq!(outcome.attempts_made(), 2);
}

#[tokio::test]
async fn test_redirect_followed_when_enabled() {
    let server = MockServer::start().await;
    mock_redirect(&server, "/old", 302, "/new").await;
    mock_status(&server, "/new", 200).await;

    let options = HttpClientOptions {
        follow_redirects: true,
        ..HttpClientOptions::default()
    };
    let client = ReqwestHttpClient::new(&options).unwrap();

    let outcome = check_endpoint_healthy(&client, &url_for(&server, "/old"), Some(1), Some(TEST_DELAY), None)
        .await
        .unwrap();

    assert!(outcome.succeeded());
    assert_eq!(outcome.attempts_made(), 1);
}

#[tokio::test]
async fn test_desired_non_200_status() {
    let server = MockServer::start().await;
    mock_status(&server, "/gone", 404).await;

    let outcome = check_endpoint_healthy(
        &client(),
        &url_for(&server, "/gone"),
        Some(2),
        Some(TEST_DELAY),
        Some(404),
    )
    .await
    .unwrap();

    assert!(outcome.succeeded());
    assert_eq!(outcome.expected(), &Expectation::Status(404));
}

#[tokio::test]
async fn test_unreachable_host_reported_as_data() {
    let outcome = check_endpoint_healthy(
        &client(),
        "http://127.0.0.1:1/",
        Some(2),
        Some(TEST_DELAY),
        None,
    )
    .await
    .unwrap();

    assert!(!outcome.succeeded());
    assert_eq!(outcome.attempts_made(), 3);
    assert!(matches!(outcome.actual(), Observed::Unreachable(_)));
    assert!(outcome.to_string().contains("unreachable"));
}

#[tokio::test]
async fn test_failed_outcome_converts_to_error() {
    let server = MockServer::start().await;
    mock_status(&server, "/", 500).await;

    let outcome = check_endpoint_healthy(&client(), &url_for(&server, "/"), Some(1), Some(TEST_DELAY), None)
        .await
        .unwrap();

    let err = outcome.ensure_succeeded().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("200"));
    assert!(message.contains("500"));
}

#[tokio::test(start_paused = true)]
async fn test_delay_between_attempts() {
    let client = ScriptedClient::statuses(&[503, 503, 200]);
    let policy = RetryPolicy::fixed(5, Duration::from_secs(3)).unwrap();

    let start = tokio::time::Instant::now();
    let outcome = EndpointHealthProbe::new(&client, "http://app.test/")
        .unwrap()
        .with_policy(policy)
        .run()
        .await;

    assert!(outcome.succeeded());
    assert_eq!(outcome.attempts_made(), 3);
    assert_eq!(client.calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_transport_errors_are_retried() {
    let client = ScriptedClient::new(vec![
        Err(TransportError::Connect {
            url: "http://app.test/".to_string(),
            message: "connection refused".to_string(),
        }),
        Err(TransportError::Timeout {
            url: "http://app.test/".to_string(),
        }),
        Ok(200),
    ]);

    let outcome = check_endpoint_healthy(&client, "http://app.test/", Some(3), None, None)
        .await
        .unwrap();

    assert!(outcome.succeeded());
    assert_eq!(outcome.attempts_made(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_match_on_final_attempt_succeeds() {
    let client = ScriptedClient::statuses(&[503, 503, 200]);

    let outcome = check_endpoint_healthy(&client, "http://app.test/", Some(2), None, None)
        .await
        .unwrap();

    assert!(outcome.succeeded());
    assert_eq!(outcome.attempts_made(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_default_budget() {
    let client = ScriptedClient::statuses(&[503]);

    let start = tokio::time::Instant::now();
    let outcome = check_endpoint_healthy(&client, "http://app.test/", None, None, None)
        .await
        .unwrap();

    assert_eq!(outcome.attempts_made(), 11);
    assert_eq!(client.calls(), 11);
    assert_eq!(start.elapsed(), Duration::from_secs(30));
}
