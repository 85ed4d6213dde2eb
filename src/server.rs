//! Simulation HTTP Server
//!
//! Serves the four scripted IPC simulations as JSON endpoints.
//!
//! ## Endpoints
//!
//! - `POST /api/pipes`: echo the message through a "pipe"
//! - `POST /api/queue`: enqueue and uppercase the message
//! - `POST /api/shared`: bump the process-wide shared counter
//! - `POST /api/deadlock`: narrate a two-lock deadlock
//! - `GET  /api/schema`: OpenAPI 3.0 schema
//! - `GET  /health`: Health check
//! - `GET  /metrics`: Prometheus metrics
//!
//! Every simulation answers `{"logs": [...]}`. `shared` and `deadlock` never
//! read the request body.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServerSection;
use crate::simulation::Simulator;
use crate::{metrics, SimulationKind};

// ============================================================================
// Types
// ============================================================================

/// JSON body accepted by the simulation endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimulateRequest {
    /// Free-text message. Missing is treated as the empty string.
    #[serde(default)]
    pub message: Option<String>,
}

/// JSON body returned by every simulation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulateResponse {
    /// Narrative lines in display order.
    pub logs: Vec<String>,
}

/// Shared application state available to all handlers.
struct AppState {
    simulator: Simulator,
}

// ============================================================================
// Server
// ============================================================================

/// Build the router with all routes and middleware attached.
pub fn router(config: &ServerSection, simulator: Simulator) -> Router {
    let state = Arc::new(AppState { simulator });

    Router::new()
        .route("/api/pipes", post(pipes_handler))
        .route("/api/queue", post(queue_handler))
        .route("/api/shared", post(shared_handler))
        .route("/api/deadlock", post(deadlock_handler))
        .route("/api/schema", get(schema_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn_with_state(
            config.max_request_size,
            body_size_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the simulation server.
///
/// Binds to `config.host:config.port` and serves until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn start_server(config: ServerSection, simulator: Simulator) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve(listener, config, simulator).await
}

/// Serve on an already-bound listener.
///
/// # Errors
///
/// Returns an error if the server loop fails.
pub async fn serve(
    listener: tokio::net::TcpListener,
    config: ServerSection,
    simulator: Simulator,
) -> std::io::Result<()> {
    let app = router(&config, simulator);
    let local = listener.local_addr()?;

    info!("IPC simulation server ready on http://{}", local);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the task is dropped.
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

// ============================================================================
// Middleware
// ============================================================================

/// Adds a unique `X-Request-ID` header to every response.
///
/// A client-supplied `X-Request-ID` is preserved; otherwise a UUID v4 is
/// generated.
async fn request_id_middleware(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

/// Rejects requests whose `Content-Length` exceeds `max_size` with 413.
async fn body_size_middleware(
    State(max_size): State<usize>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(content_length) = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
    {
        if content_length > max_size {
            return AppError::PayloadTooLarge.into_response();
        }
    }

    next.run(req).await
}

// ============================================================================
// Simulation Handlers
// ============================================================================

async fn simulate_with_message(
    state: &AppState,
    kind: SimulationKind,
    body: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulateResponse>, AppError> {
    let Json(req) = body.map_err(|rejection| {
        metrics::inc_rejected(kind.as_str());
        warn!(kind = kind.as_str(), error = %rejection, "malformed request body");
        AppError::MalformedBody(rejection.body_text())
    })?;

    let message = req.message.unwrap_or_default();
    let logs = state.simulator.run(kind, &message).await;
    Ok(Json(SimulateResponse { logs }))
}

/// `POST /api/pipes`
async fn pipes_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulateResponse>, AppError> {
    simulate_with_message(&state, SimulationKind::Pipes, body).await
}

/// `POST /api/queue`
async fn queue_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulateResponse>, AppError> {
    simulate_with_message(&state, SimulationKind::Queue, body).await
}

/// `POST /api/shared`: body is never read.
async fn shared_handler(State(state): State<Arc<AppState>>) -> Json<SimulateResponse> {
    let logs = state.simulator.run(SimulationKind::Shared, "").await;
    Json(SimulateResponse { logs })
}

/// `POST /api/deadlock`: body is never read.
async fn deadlock_handler(State(state): State<Arc<AppState>>) -> Json<SimulateResponse> {
    let logs = state.simulator.run(SimulationKind::Deadlock, "").await;
    Json(SimulateResponse { logs })
}

// ============================================================================
// Utility Handlers
// ============================================================================

/// `GET /health`
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /metrics`
async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

/// `GET /api/schema`
async fn schema_handler() -> (
    StatusCode,
    [(header::HeaderName, &'static str); 1],
    &'static str,
) {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        OPENAPI_SCHEMA,
    )
}

/// Static OpenAPI 3.0 specification.
const OPENAPI_SCHEMA: &str = r##"{
  "openapi": "3.0.0",
  "info": {
    "title": "ipc-debugger",
    "version": "1.0.0",
    "description": "Scripted IPC simulations: pipes, message queues, shared memory and deadlock"
  },
  "paths": {
    "/api/pipes": {
      "post": {
        "summary": "Pipe simulation (echoes the message)",
        "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/SimulateRequest"}}}},
        "responses": {
          "200": {"description": "Narrative", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/SimulateResponse"}}}},
          "400": {"description": "Malformed body"}
        }
      }
    },
    "/api/queue": {
      "post": {
        "summary": "Message queue simulation (uppercases the message)",
        "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/SimulateRequest"}}}},
        "responses": {
          "200": {"description": "Narrative", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/SimulateResponse"}}}},
          "400": {"description": "Malformed body"}
        }
      }
    },
    "/api/shared": {
      "post": {
        "summary": "Shared memory simulation (bumps the process-wide counter)",
        "responses": {
          "200": {"description": "Narrative", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/SimulateResponse"}}}}
        }
      }
    },
    "/api/deadlock": {
      "post": {
        "summary": "Deadlock narrative",
        "responses": {
          "200": {"description": "Narrative", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/SimulateResponse"}}}}
        }
      }
    },
    "/api/schema": {
      "get": {"summary": "This document", "responses": {"200": {"description": "OpenAPI schema"}}}
    },
    "/health": {
      "get": {"summary": "Health check", "responses": {"200": {"description": "Healthy"}}}
    },
    "/metrics": {
      "get": {"summary": "Prometheus metrics", "responses": {"200": {"description": "Text exposition format"}}}
    }
  },
  "components": {
    "schemas": {
      "SimulateRequest": {
        "type": "object",
        "properties": {"message": {"type": "string"}}
      },
      "SimulateResponse": {
        "type": "object",
        "required": ["logs"],
        "properties": {"logs": {"type": "array", "items": {"type": "string"}}}
      }
    }
  }
}"##;

// ============================================================================
// Errors
// ============================================================================

/// Errors a handler can return; rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The body was not valid JSON of the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    /// `Content-Length` exceeded the configured limit.
    #[error("request body too large")]
    PayloadTooLarge,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        };

        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_schema_is_valid_json() {
        let parsed: serde_json::Value =
            serde_json::from_str(OPENAPI_SCHEMA).expect("OPENAPI_SCHEMA must be valid JSON");
        assert_eq!(parsed["openapi"], "3.0.0");
    }

    #[test]
    fn test_openapi_schema_contains_all_endpoints() {
        let parsed: serde_json::Value = serde_json::from_str(OPENAPI_SCHEMA).expect("valid JSON");
        let paths = parsed["paths"].as_object().expect("paths is object");
        for kind in SimulationKind::ALL {
            assert!(paths.contains_key(&kind.route()), "missing {}", kind.route());
        }
        assert!(paths.contains_key("/api/schema"));
        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/metrics"));
    }

    #[test]
    fn test_simulate_request_message_optional() {
        let req: SimulateRequest = serde_json::from_str("{}").expect("deser");
        assert!(req.message.is_none());
        let req: SimulateRequest = serde_json::from_str(r#"{"message":"hi"}"#).expect("deser");
        assert_eq!(req.message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_simulate_response_shape() {
        let resp = SimulateResponse {
            logs: vec!["a".into(), "b".into()],
        };
        let json = serde_json::to_value(&resp).expect("ser");
        assert_eq!(json, serde_json::json!({"logs": ["a", "b"]}));
    }

    #[test]
    fn test_app_error_malformed_returns_400() {
        let resp = AppError::MalformedBody("bad".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_app_error_too_large_returns_413() {
        let resp = AppError::PayloadTooLarge.into_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
