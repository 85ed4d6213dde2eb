//! # ipc-debugger
//!
//! Scripted simulations of four classic IPC mechanisms, served over HTTP and
//! replayed into a terminal console.
//!
//! ## Architecture
//!
//! ```text
//! console (tui | headless) ── Orchestrator ── HTTP ──▶ server ── Simulator
//!                                  │                              │
//!                             LogBuffer, counters           SharedCounter
//! ```
//!
//! Nothing here performs real IPC. Each endpoint sleeps for a fixed delay and
//! returns a canned narrative; the shared-memory endpoint additionally bumps
//! one unsynchronised process-wide counter.

// ── Lint policy ───────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![warn(missing_docs)]

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub mod client;
pub mod config;
pub mod metrics;
pub mod simulation;

#[cfg(feature = "web-api")]
pub mod server;

#[cfg(feature = "tui")]
pub mod tui;

// Re-exports for convenience
pub use client::{ConsoleEvent, HttpSimulationApi, Orchestrator, SimulationApi};
pub use config::{DebuggerConfig, LogFormat};
pub use simulation::{SharedCounter, Simulator};

/// Initialise the global tracing subscriber.
///
/// The `LOG_FORMAT` environment variable wins over `default_format`:
/// - `"json"`: structured JSON output for log aggregators
/// - anything else: human-readable pretty output
///
/// Filter level is controlled by `RUST_LOG` (e.g. `RUST_LOG=info`).
///
/// # Errors
///
/// Returns [`DebuggerError::Other`] if the global subscriber has already
/// been set (e.g. by a previous call or a test harness).
///
/// # Panics
///
/// This function never panics.
pub fn init_tracing(default_format: LogFormat) -> Result<(), DebuggerError> {
    init_tracing_with_writer(default_format, std::io::stdout)
}

/// [`init_tracing`] with an explicit sink.
///
/// The console binary prints log lines on stdout, so it sends diagnostics to
/// `std::io::stderr` instead.
///
/// # Errors
///
/// Same as [`init_tracing`].
pub fn init_tracing_with_writer<W>(default_format: LogFormat, writer: W) -> Result<(), DebuggerError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let format = match std::env::var("LOG_FORMAT") {
        Ok(v) if v == "json" => LogFormat::Json,
        Ok(_) => LogFormat::Pretty,
        Err(_) => default_format,
    };

    let result = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(writer)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(writer)
            .try_init(),
    };

    result.map_err(|e| DebuggerError::Other(format!("tracing init failed: {e}")))
}

/// Top-level errors surfaced at startup and by kind parsing.
#[derive(Error, Debug)]
pub enum DebuggerError {
    /// A simulation kind string did not match any known variant.
    #[error("unknown simulation kind: {0}")]
    UnknownKind(String),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    ConfigError(#[from] config::validation::ConfigError),

    /// Socket bind, serve or terminal failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for errors that do not fit a specific variant.
    #[error("{0}")]
    Other(String),
}

/// The four scripted IPC simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationKind {
    /// Anonymous pipe: echoes the message back.
    Pipes,
    /// Message queue: enqueues and uppercases the message.
    Queue,
    /// Shared memory: bumps the process-wide counter.
    Shared,
    /// Two workers, two locks, opposite acquisition order.
    Deadlock,
}

impl SimulationKind {
    /// Every kind, in run-all order.
    pub const ALL: [SimulationKind; 4] = [
        SimulationKind::Pipes,
        SimulationKind::Queue,
        SimulationKind::Shared,
        SimulationKind::Deadlock,
    ];

    /// Lowercase identifier, also used as the route segment and metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pipes => "pipes",
            Self::Queue => "queue",
            Self::Shared => "shared",
            Self::Deadlock => "deadlock",
        }
    }

    /// Position in [`SimulationKind::ALL`], used to index per-kind arrays.
    pub fn index(&self) -> usize {
        match self {
            Self::Pipes => 0,
            Self::Queue => 1,
            Self::Shared => 2,
            Self::Deadlock => 3,
        }
    }

    /// HTTP path of this kind's endpoint.
    pub fn route(&self) -> String {
        format!("/api/{}", self.as_str())
    }

    /// Artificial delay applied by the endpoint when not overridden by config.
    pub fn default_delay(&self) -> Duration {
        match self {
            Self::Pipes | Self::Queue => Duration::from_millis(1200),
            Self::Shared => Duration::from_millis(800),
            Self::Deadlock => Duration::from_millis(1500),
        }
    }

    /// Short display name used in charts and summaries.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Pipes => "Pipes",
            Self::Queue => "Queue",
            Self::Shared => "Shared",
            Self::Deadlock => "Deadlock",
        }
    }

    /// Label of the idle trigger control.
    pub fn trigger_label(&self) -> &'static str {
        match self {
            Self::Pipes => "Test Pipes",
            Self::Queue => "Test Message Queue",
            Self::Shared => "Test Shared Memory",
            Self::Deadlock => "Simulate Deadlock",
        }
    }

    /// Label shown while this kind's call is in flight.
    pub fn busy_label(&self) -> &'static str {
        match self {
            Self::Pipes => "Running Pipes...",
            Self::Queue => "Running Queue...",
            Self::Shared => "Running Shared...",
            Self::Deadlock => "Simulating Deadlock...",
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationKind {
    type Err = DebuggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pipes" | "pipe" => Ok(Self::Pipes),
            "queue" => Ok(Self::Queue),
            "shared" | "shm" => Ok(Self::Shared),
            "deadlock" => Ok(Self::Deadlock),
            other => Err(DebuggerError::UnknownKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader;
    use crate::config::validation::ConfigError;

    fn load(content: &str) -> Result<DebuggerConfig, DebuggerError> {
        Ok(loader::load_from_str(content, "inline")?)
    }

    fn bind_failure() -> Result<(), DebuggerError> {
        let bind: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"));
        Ok(bind?)
    }

    #[test]
    fn test_kind_as_str_matches_route_segment() {
        for kind in SimulationKind::ALL {
            assert_eq!(kind.route(), format!("/api/{}", kind.as_str()));
        }
    }

    #[test]
    fn test_kind_index_matches_position_in_all() {
        for (i, kind) in SimulationKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_kind_from_str_accepts_aliases_and_case() {
        assert_eq!("PIPES".parse::<SimulationKind>().ok(), Some(SimulationKind::Pipes));
        assert_eq!("pipe".parse::<SimulationKind>().ok(), Some(SimulationKind::Pipes));
        assert_eq!(" shm ".parse::<SimulationKind>().ok(), Some(SimulationKind::Shared));
        assert_eq!("Deadlock".parse::<SimulationKind>().ok(), Some(SimulationKind::Deadlock));
    }

    #[test]
    fn test_kind_from_str_rejects_unknown() {
        let err = "semaphore".parse::<SimulationKind>().unwrap_err();
        assert!(matches!(err, DebuggerError::UnknownKind(ref s) if s == "semaphore"));
        assert!(err.to_string().contains("semaphore"));
    }

    #[test]
    fn test_kind_default_delays() {
        assert_eq!(SimulationKind::Pipes.default_delay(), Duration::from_millis(1200));
        assert_eq!(SimulationKind::Queue.default_delay(), Duration::from_millis(1200));
        assert_eq!(SimulationKind::Shared.default_delay(), Duration::from_millis(800));
        assert_eq!(SimulationKind::Deadlock.default_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&SimulationKind::Deadlock).expect("ser");
        assert_eq!(json, "\"deadlock\"");
    }

    #[test]
    fn test_busy_and_trigger_labels_differ() {
        for kind in SimulationKind::ALL {
            assert_ne!(kind.trigger_label(), kind.busy_label());
        }
    }

    #[test]
    fn test_init_tracing_second_call_returns_err() {
        // First call may succeed or fail depending on test execution order.
        let _ = init_tracing(LogFormat::Pretty);
        let result = init_tracing(LogFormat::Pretty);
        assert!(result.is_err(), "double init must return Err, not panic");
    }

    // ── DebuggerError conversions ─────────────────────────────────────────

    #[test]
    fn test_config_parse_failure_converts_to_config_error() {
        let err = load("[server\nport = 1").unwrap_err();
        assert!(matches!(err, DebuggerError::ConfigError(ConfigError::Parse { .. })));
        assert!(err.to_string().starts_with("configuration error:"));
    }

    #[test]
    fn test_io_failure_converts_to_io_variant() {
        let err = bind_failure().unwrap_err();
        assert!(matches!(err, DebuggerError::Io(_)));
        assert!(err.to_string().contains("port taken"));
    }
}
