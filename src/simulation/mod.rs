//! # Module: Simulations
//!
//! ## Responsibility
//! Produce the scripted narrative for each [`SimulationKind`] after its
//! artificial delay, and own the one piece of real shared state (the
//! shared-memory counter).
//!
//! ## Guarantees
//! - `run` never returns before the kind's configured delay has elapsed
//! - Output is never empty and always in narrative order
//! - Only `Shared` has a side effect
//!
//! ## NOT Responsible For
//! - HTTP framing (that belongs to `server`)
//! - Per-line reveal timing (that belongs to `client`)

pub mod narrative;
pub mod shared;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::SimulationSection;
use crate::{metrics, SimulationKind};

pub use shared::SharedCounter;

/// Runs simulations. Cheap to clone; clones share one counter.
#[derive(Debug, Clone)]
pub struct Simulator {
    timings: SimulationSection,
    counter: Arc<SharedCounter>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulationSection::default())
    }
}

impl Simulator {
    /// Create a simulator with a fresh counter at zero.
    pub fn new(timings: SimulationSection) -> Self {
        Self {
            timings,
            counter: Arc::new(SharedCounter::default()),
        }
    }

    /// The shared-memory counter.
    pub fn counter(&self) -> &SharedCounter {
        &self.counter
    }

    /// Configured delay for `kind`.
    pub fn delay_for(&self, kind: SimulationKind) -> Duration {
        self.timings.delay_for(kind)
    }

    /// Run one simulation and return its narrative.
    ///
    /// `message` is ignored by `Shared` and `Deadlock`. The shared counter is
    /// bumped before the delay, so the race window spans the whole sleep.
    pub async fn run(&self, kind: SimulationKind, message: &str) -> Vec<String> {
        let start = Instant::now();
        let delay = self.delay_for(kind);

        let logs = match kind {
            SimulationKind::Pipes => narrative::pipe(message),
            SimulationKind::Queue => narrative::queue(message),
            SimulationKind::Shared => {
                let increment = self.timings.shared_increment;
                let (old, new) = self.counter.bump(increment);
                metrics::set_shared_counter(new);
                debug!(old, new, increment, "shared counter bumped");
                narrative::shared(old, new, increment)
            }
            SimulationKind::Deadlock => narrative::deadlock(),
        };

        tokio::time::sleep(delay).await;

        metrics::inc_simulation(kind.as_str());
        metrics::record_simulation_latency(kind.as_str(), start.elapsed());
        info!(
            kind = kind.as_str(),
            delay_ms = delay.as_millis() as u64,
            lines = logs.len(),
            "simulation complete"
        );

        logs
    }
}
