//! Simulation API abstraction and the reqwest-backed implementation.
//!
//! The orchestrator only sees [`SimulationApi`], so tests drive it with a
//! scripted in-memory backend and the console drives it over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::SimulationKind;

/// The two ways a call can fail from the console's point of view.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Connect failure, timeout, or non-success HTTP status.
    #[error("network error: {0}")]
    Transport(String),
    /// The response body was not JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// What a successful call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    /// The body carried a `logs` array.
    Logs(Vec<String>),
    /// The body was JSON but had no `logs` array.
    NoLogs,
}

/// Trait for simulation backends.
///
/// Implementations must be thread-safe (Send + Sync) so the orchestrator can
/// call them from spawned tasks via `Arc<dyn SimulationApi>`.
#[async_trait]
pub trait SimulationApi: Send + Sync {
    /// Run one simulation of `kind` with `message`.
    async fn simulate(
        &self,
        kind: SimulationKind,
        message: &str,
    ) -> Result<SimulationOutcome, ClientError>;
}

#[derive(Debug, Serialize)]
struct SimulateBody<'a> {
    message: &'a str,
}

/// HTTP client for the simulation server.
///
/// ## Example
///
/// ```no_run
/// use ipc_debugger::HttpSimulationApi;
/// use std::time::Duration;
///
/// let api = HttpSimulationApi::new("http://127.0.0.1:3000")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct HttpSimulationApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSimulationApi {
    /// Create a client for the server at `base_url` (no trailing `/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of `kind`'s endpoint.
    pub fn endpoint(&self, kind: SimulationKind) -> String {
        format!("{}{}", self.base_url, kind.route())
    }
}

/// Interpret a response body.
///
/// Non-string array elements are kept in their JSON rendering rather than
/// dropped.
pub fn parse_outcome(body: &str) -> Result<SimulationOutcome, ClientError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

    let Some(items) = value.get("logs").and_then(|v| v.as_array()) else {
        return Ok(SimulationOutcome::NoLogs);
    };

    let lines = items
        .iter()
        .map(|item| match item.as_str() {
            Some(s) => s.to_string(),
            None => item.to_string(),
        })
        .collect();
    Ok(SimulationOutcome::Logs(lines))
}

#[async_trait]
impl SimulationApi for HttpSimulationApi {
    /// POST `{"message": ...}` to the kind's route and parse the reply.
    ///
    /// A non-2xx status is a [`ClientError::Transport`] even when the body is
    /// valid JSON, so it logs an error line and leaves the counter alone
    /// rather than completing as a log-less success.
    async fn simulate(
        &self,
        kind: SimulationKind,
        message: &str,
    ) -> Result<SimulationOutcome, ClientError> {
        let response = self
            .client
            .post(self.endpoint(kind))
            .timeout(self.timeout)
            .json(&SimulateBody { message })
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(ClientError::Transport(format!("HTTP {status}: {body}")));
        }

        parse_outcome(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_outcome_logs_array() {
        let out = parse_outcome(r#"{"logs":["a","b"]}"#).expect("parse");
        assert_eq!(out, SimulationOutcome::Logs(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_parse_outcome_missing_logs_is_no_logs() {
        assert_eq!(
            parse_outcome(r#"{"ok":true}"#).expect("parse"),
            SimulationOutcome::NoLogs
        );
        assert_eq!(
            parse_outcome(r#"{"logs":"not an array"}"#).expect("parse"),
            SimulationOutcome::NoLogs
        );
    }

    #[test]
    fn test_parse_outcome_non_string_items_rendered() {
        let out = parse_outcome(r#"{"logs":["x", 5, null]}"#).expect("parse");
        assert_eq!(
            out,
            SimulationOutcome::Logs(vec!["x".into(), "5".into(), "null".into()])
        );
    }

    #[test]
    fn test_parse_outcome_invalid_json_is_malformed() {
        let err = parse_outcome("<html>").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let api = HttpSimulationApi::new("http://localhost:3000/");
        assert_eq!(
            api.endpoint(SimulationKind::Queue),
            "http://localhost:3000/api/queue"
        );
    }

    #[test]
    fn test_client_error_display() {
        assert_eq!(
            ClientError::Transport("boom".into()).to_string(),
            "network error: boom"
        );
        assert!(ClientError::MalformedResponse("x".into())
            .to_string()
            .starts_with("malformed response"));
    }
}
