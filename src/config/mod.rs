//! # Module: Declarative Configuration
//!
//! ## Responsibility
//! Parse and validate the TOML file shared by the simulation server and the
//! console client:
//! ```text
//! ipc-debugger --config debugger.toml
//! ipc-console  --config debugger.toml tui
//! ```
//!
//! ## Guarantees
//! - Deterministic: same TOML input always produces the same `DebuggerConfig`
//! - Total: every field has a documented default, so an empty file is valid
//! - Validated: semantic constraints are checked before a config is accepted
//! - Schema-exportable: JSON Schema output enables IDE autocomplete
//!
//! ## NOT Responsible For
//! - Building the HTTP router (that belongs to `server`)
//! - Scheduling calls (that belongs to `client`)

pub mod loader;
pub mod validation;

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::SimulationKind;

// ── Default value functions ──────────────────────────────────────────────

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Default request body cap: 64 KiB. Bodies only ever carry one message.
fn default_max_request_size() -> usize {
    64 * 1024
}

fn default_pipes_delay_ms() -> u64 {
    1200
}

fn default_queue_delay_ms() -> u64 {
    1200
}

fn default_shared_delay_ms() -> u64 {
    800
}

fn default_deadlock_delay_ms() -> u64 {
    1500
}

fn default_shared_increment() -> i64 {
    5
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_message() -> String {
    "Hello from the IPC Debugger!".to_string()
}

/// Default per-line reveal stride: 300ms.
fn default_reveal_stride_ms() -> u64 {
    300
}

fn default_run_all_offsets_ms() -> Vec<u64> {
    vec![500, 2500, 4500, 6500]
}

fn default_run_all_settle_ms() -> u64 {
    8500
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

// ── Top-level config ─────────────────────────────────────────────────────

/// Root configuration for both binaries.
///
/// # Example
///
/// ```toml
/// [server]
/// port = 4000
///
/// [simulation]
/// shared_increment = 5
///
/// [client]
/// base_url = "http://127.0.0.1:4000"
/// reveal_stride_ms = 200
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DebuggerConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,
    /// Per-kind delays and the shared-memory increment.
    #[serde(default)]
    pub simulation: SimulationSection,
    /// Console client scheduling.
    #[serde(default)]
    pub client: ClientSection,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ── Server ───────────────────────────────────────────────────────────────

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ServerSection {
    /// IP address or hostname to bind to (e.g. `"0.0.0.0"` for all interfaces).
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port the server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_request_size: default_max_request_size(),
        }
    }
}

// ── Simulation ───────────────────────────────────────────────────────────

/// Artificial delays and the shared-memory step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SimulationSection {
    /// Delay of the pipe endpoint in milliseconds.
    #[serde(default = "default_pipes_delay_ms")]
    pub pipes_delay_ms: u64,
    /// Delay of the message-queue endpoint in milliseconds.
    #[serde(default = "default_queue_delay_ms")]
    pub queue_delay_ms: u64,
    /// Delay of the shared-memory endpoint in milliseconds.
    #[serde(default = "default_shared_delay_ms")]
    pub shared_delay_ms: u64,
    /// Delay of the deadlock endpoint in milliseconds.
    #[serde(default = "default_deadlock_delay_ms")]
    pub deadlock_delay_ms: u64,
    /// Amount added to the shared counter on every shared-memory call.
    #[serde(default = "default_shared_increment")]
    pub shared_increment: i64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            pipes_delay_ms: default_pipes_delay_ms(),
            queue_delay_ms: default_queue_delay_ms(),
            shared_delay_ms: default_shared_delay_ms(),
            deadlock_delay_ms: default_deadlock_delay_ms(),
            shared_increment: default_shared_increment(),
        }
    }
}

impl SimulationSection {
    /// Configured delay for `kind`.
    pub fn delay_for(&self, kind: SimulationKind) -> Duration {
        let ms = match kind {
            SimulationKind::Pipes => self.pipes_delay_ms,
            SimulationKind::Queue => self.queue_delay_ms,
            SimulationKind::Shared => self.shared_delay_ms,
            SimulationKind::Deadlock => self.deadlock_delay_ms,
        };
        Duration::from_millis(ms)
    }
}

// ── Client ───────────────────────────────────────────────────────────────

/// Console client scheduling.
///
/// Offsets are open-loop: the run-all schedule never waits on a previous
/// call's completion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClientSection {
    /// Base URL of the simulation server, without trailing `/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Message pre-filled in the input box.
    #[serde(default = "default_message")]
    pub default_message: String,
    /// Gap between consecutive revealed lines of one response.
    #[serde(default = "default_reveal_stride_ms")]
    pub reveal_stride_ms: u64,
    /// Absolute offsets for pipes, queue, shared and deadlock in a run-all.
    #[serde(default = "default_run_all_offsets_ms")]
    pub run_all_offsets_ms: Vec<u64>,
    /// Offset after which the run-all control is re-enabled.
    #[serde(default = "default_run_all_settle_ms")]
    pub run_all_settle_ms: u64,
    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_message: default_message(),
            reveal_stride_ms: default_reveal_stride_ms(),
            run_all_offsets_ms: default_run_all_offsets_ms(),
            run_all_settle_ms: default_run_all_settle_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ClientSection {
    /// Reveal stride as a [`Duration`].
    pub fn reveal_stride(&self) -> Duration {
        Duration::from_millis(self.reveal_stride_ms)
    }

    /// HTTP timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Run-all schedule paired with the kind fired at each offset.
    ///
    /// Missing offsets fall back to the defaults, so this is total even for an
    /// unvalidated config.
    pub fn run_all_schedule(&self) -> [(SimulationKind, Duration); 4] {
        let defaults = default_run_all_offsets_ms();
        SimulationKind::ALL.map(|kind| {
            let i = kind.index();
            let ms = self
                .run_all_offsets_ms
                .get(i)
                .copied()
                .unwrap_or(defaults[i]);
            (kind, Duration::from_millis(ms))
        })
    }

    /// Settle offset as a [`Duration`].
    pub fn run_all_settle(&self) -> Duration {
        Duration::from_millis(self.run_all_settle_ms)
    }
}

// ── Observability ────────────────────────────────────────────────────────

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ObservabilityConfig {
    /// Log output format when `LOG_FORMAT` is unset.
    #[serde(default)]
    pub log_format: LogFormat,
    /// Whether the Prometheus registry is initialised and `/metrics` populated.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            metrics_enabled: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable, colorized log output.
    #[default]
    Pretty,
    /// Structured JSON log output for machine consumption.
    Json,
}

/// Export the JSON Schema for `DebuggerConfig`.
///
/// # Errors
///
/// Returns `serde_json::Error` if schema serialization fails.
pub fn export_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(DebuggerConfig);
    serde_json::to_string_pretty(&schema)
}
