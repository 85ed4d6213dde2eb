//! Console-side orchestration: calling the simulation endpoints and turning
//! their responses into a timed, append-only log.
//!
//! - [`api`]: the [`SimulationApi`] seam and its HTTP implementation
//! - [`log`]: timestamped [`LogEntry`] and the unbounded [`LogBuffer`]
//! - [`state`]: per-kind counters, loading flags and [`ConsoleSnapshot`]
//! - [`orchestrator`]: the [`Orchestrator`] state machine

pub mod api;
pub mod log;
pub mod orchestrator;
pub mod state;

pub use api::{ClientError, HttpSimulationApi, SimulationApi, SimulationOutcome};
pub use log::{LogBuffer, LogEntry};
pub use orchestrator::Orchestrator;
pub use state::{ConsoleSnapshot, InvocationCounters, LoadingFlags};

/// Change notification for streaming presenters.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// One line was appended.
    Appended(LogEntry),
    /// The buffer was emptied.
    Cleared,
}
