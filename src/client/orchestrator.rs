//! # Module: Orchestrator
//!
//! ## Responsibility
//! Drive simulation calls on behalf of a presenter and own the console state
//! they produce: the log buffer, per-kind counters, per-kind loading flags,
//! the run-all flag and the outgoing message.
//!
//! ## Guarantees
//! - A kind already in flight is never re-triggered through [`Orchestrator::trigger`].
//! - Returned narrative lines are revealed one per stride, in response order.
//! - Counters move only on success, by exactly one.
//! - Loading flags are cleared on every outcome.
//! - Run-all fires on fixed offsets, independent of earlier completions.
//!
//! ## NOT Responsible For
//! - Rendering (see `tui` and the console binary)
//! - Transport details (see [`super::api`])
//! - Cancelling scheduled work once fired

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ClientSection;
use crate::SimulationKind;

use super::api::{SimulationApi, SimulationOutcome};
use super::log::LogBuffer;
use super::state::{ConsoleSnapshot, InvocationCounters, LoadingFlags};
use super::ConsoleEvent;

/// Line appended when an orchestrator is created.
pub const STARTUP_LINE: &str = "🚀 IPC Debugger UI Initialized Successfully";
/// Line appended when run-all starts.
pub const RUN_ALL_LINE: &str = "📤 Sending message to all IPC methods...";
/// Line left behind by [`Orchestrator::clear`].
pub const CLEARED_LINE: &str = "🧹 Logs cleared.";
/// Line appended when a response has no `logs` array.
pub const COMPLETE_LINE: &str = "✅ Simulation complete";

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct ConsoleState {
    log: LogBuffer,
    counters: InvocationCounters,
    loading: LoadingFlags,
    running: bool,
    message: String,
}

struct Inner {
    api: Arc<dyn SimulationApi>,
    state: Mutex<ConsoleState>,
    events: broadcast::Sender<ConsoleEvent>,
    stride: Duration,
    schedule: [(SimulationKind, Duration); 4],
    settle: Duration,
}

/// Shared handle to the console state machine.
///
/// Cloning is cheap; every clone drives the same state. All scheduling goes
/// through `tokio::spawn`, so [`Orchestrator::trigger`] and
/// [`Orchestrator::run_all`] must be called from inside a Tokio runtime.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("stride", &self.inner.stride)
            .field("schedule", &self.inner.schedule)
            .field("settle", &self.inner.settle)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Build an orchestrator over `api` using the timings in `config`.
    ///
    /// The message starts as `config.default_message` and the log starts with
    /// [`STARTUP_LINE`].
    pub fn new(api: Arc<dyn SimulationApi>, config: &ClientSection) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = ConsoleState {
            message: config.default_message.clone(),
            ..ConsoleState::default()
        };
        let orchestrator = Self {
            inner: Arc::new(Inner {
                api,
                state: Mutex::new(state),
                events,
                stride: config.reveal_stride(),
                schedule: config.run_all_schedule(),
                settle: config.run_all_settle(),
            }),
        };
        orchestrator.append(STARTUP_LINE);
        orchestrator
    }

    /// Start a single call for `kind`.
    ///
    /// Returns `None` without doing anything if `kind` is already in flight.
    /// The returned handle resolves once the response is handled; revealed
    /// lines keep arriving for up to `(n - 1) × stride` afterwards.
    pub fn trigger(&self, kind: SimulationKind) -> Option<JoinHandle<()>> {
        {
            let mut state = self.inner.state.lock();
            if state.loading.get(kind) {
                debug!(kind = kind.as_str(), "trigger ignored; already loading");
                return None;
            }
            state.loading.set(kind, true);
        }
        let this = self.clone();
        Some(tokio::spawn(async move { this.call(kind).await }))
    }

    /// Fire every kind on the run-all schedule.
    ///
    /// Returns `false` if a run-all is already in progress.
    pub fn run_all(&self) -> bool {
        {
            let mut state = self.inner.state.lock();
            if state.running {
                return false;
            }
            state.running = true;
        }
        info!("run-all started");
        self.append(RUN_ALL_LINE);

        for (kind, offset) in self.inner.schedule {
            let this = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(offset).await;
                this.inner.state.lock().loading.set(kind, true);
                this.call(kind).await;
            });
        }

        let this = self.clone();
        let settle = self.inner.settle;
        tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            this.inner.state.lock().running = false;
            debug!("run-all settled");
        });
        true
    }

    /// Empty the log, leaving only [`CLEARED_LINE`].
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        state.log.clear();
        let _ = self.inner.events.send(ConsoleEvent::Cleared);
        let entry = state.log.push(CLEARED_LINE).clone();
        let _ = self.inner.events.send(ConsoleEvent::Appended(entry));
    }

    /// Replace the message sent with subsequent calls.
    pub fn set_message(&self, message: impl Into<String>) {
        self.inner.state.lock().message = message.into();
    }

    /// Current message.
    pub fn message(&self) -> String {
        self.inner.state.lock().message.clone()
    }

    /// Whether `kind` is in flight.
    pub fn is_loading(&self, kind: SimulationKind) -> bool {
        self.inner.state.lock().loading.get(kind)
    }

    /// Whether a run-all is in progress.
    pub fn is_running(&self) -> bool {
        self.inner.state.lock().running
    }

    /// Per-kind success counts.
    pub fn counters(&self) -> InvocationCounters {
        self.inner.state.lock().counters
    }

    /// Copy of everything a presenter needs to draw one frame.
    pub fn snapshot(&self) -> ConsoleSnapshot {
        let state = self.inner.state.lock();
        ConsoleSnapshot {
            entries: state.log.entries().to_vec(),
            counters: state.counters,
            loading: state.loading,
            running: state.running,
            message: state.message.clone(),
        }
    }

    /// Stream of appends and clears from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.inner.events.subscribe()
    }

    /// Push and broadcast under one lock so subscribers see buffer order.
    fn append(&self, text: impl Into<String>) {
        let mut state = self.inner.state.lock();
        let entry = state.log.push(text).clone();
        // No receivers is fine; the buffer is the source of truth.
        let _ = self.inner.events.send(ConsoleEvent::Appended(entry));
    }

    /// Call path shared by trigger and run-all. The loading flag is already set.
    async fn call(&self, kind: SimulationKind) {
        self.append(format!(
            "🧪 Running {} simulation...",
            kind.as_str().to_uppercase()
        ));
        let message = self.message();
        debug!(kind = kind.as_str(), "simulation call started");

        match self.inner.api.simulate(kind, &message).await {
            Ok(SimulationOutcome::Logs(lines)) => {
                self.reveal(lines);
                self.inner.state.lock().counters.increment(kind);
                info!(kind = kind.as_str(), "simulation call succeeded");
            }
            Ok(SimulationOutcome::NoLogs) => {
                self.append(COMPLETE_LINE);
                self.inner.state.lock().counters.increment(kind);
                info!(kind = kind.as_str(), "simulation call succeeded without logs");
            }
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "simulation call failed");
                self.append(format!("❌ Error: {e}"));
            }
        }

        self.inner.state.lock().loading.set(kind, false);
    }

    fn reveal(&self, lines: Vec<String>) {
        let stride = self.inner.stride;
        for (i, line) in lines.into_iter().enumerate() {
            let this = self.clone();
            let at = stride.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX));
            tokio::spawn(async move {
                tokio::time::sleep(at).await;
                this.append(line);
            });
        }
    }
}
