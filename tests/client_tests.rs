//! Tests for `HttpSimulationApi` against a wiremock server.
//!
//! Covers the response shapes the orchestrator has to cope with: a normal
//! `logs` array, JSON without `logs`, non-JSON bodies, error statuses and
//! timeouts.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipc_debugger::client::{ClientError, SimulationOutcome};
use ipc_debugger::{HttpSimulationApi, SimulationApi, SimulationKind};

#[tokio::test]
async fn test_posts_message_and_parses_logs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pipes"))
        .and(body_json(json!({"message": "ping"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": ["a", "b"]})))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpSimulationApi::new(server.uri());
    let out = api
        .simulate(SimulationKind::Pipes, "ping")
        .await
        .expect("test: simulate");
    assert_eq!(out, SimulationOutcome::Logs(vec!["a".into(), "b".into()]));
}

#[tokio::test]
async fn test_each_kind_hits_its_route() {
    let server = MockServer::start().await;
    for kind in SimulationKind::ALL {
        Mock::given(method("POST"))
            .and(path(kind.route()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"logs": [kind.as_str()]})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = HttpSimulationApi::new(server.uri());
    for kind in SimulationKind::ALL {
        let out = api.simulate(kind, "").await.expect("test: simulate");
        assert_eq!(out, SimulationOutcome::Logs(vec![kind.as_str().to_string()]));
    }
}

#[tokio::test]
async fn test_json_without_logs_is_no_logs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let api = HttpSimulationApi::new(server.uri());
    let out = api
        .simulate(SimulationKind::Queue, "x")
        .await
        .expect("test: simulate");
    assert_eq!(out, SimulationOutcome::NoLogs);
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let api = HttpSimulationApi::new(server.uri());
    let err = api.simulate(SimulationKind::Shared, "").await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_error_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let api = HttpSimulationApi::new(server.uri());
    let err = api.simulate(SimulationKind::Deadlock, "").await.unwrap_err();
    match err {
        ClientError::Transport(msg) => assert!(msg.contains("500"), "{msg}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"logs": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let api = HttpSimulationApi::new(server.uri()).with_timeout(Duration::from_millis(50));
    let err = api.simulate(SimulationKind::Pipes, "").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 9 (discard) in CI sandboxes.
    let api = HttpSimulationApi::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
    let err = api.simulate(SimulationKind::Pipes, "").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
