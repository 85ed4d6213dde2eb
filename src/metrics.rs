//! Prometheus metrics for the simulation server.
//!
//! ## Usage
//!
//! Call [`init_metrics`] once at process startup. The helper functions
//! (`inc_simulation`, `record_simulation_latency`, …) are no-ops if
//! `init_metrics` was never called, so simulations always run and
//! observability simply degrades gracefully.
//!
//! ## Metrics Exposed
//!
//! | Name | Type | Labels |
//! |------|------|--------|
//! | `ipc_simulations_total` | Counter | `kind` |
//! | `ipc_rejected_requests_total` | Counter | `kind` |
//! | `ipc_simulation_duration_seconds` | Histogram | `kind` |
//! | `ipc_shared_counter_value` | Gauge | |

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge, Opts, Registry, TextEncoder,
};

use crate::DebuggerError;

/// All Prometheus metrics, bundled so they can live in a single [`OnceLock`].
pub struct Metrics {
    /// Prometheus registry that owns all metric descriptors.
    pub registry: Registry,
    /// Completed simulations per kind.
    pub simulations_total: CounterVec,
    /// Requests rejected before simulating (malformed body) per kind.
    pub rejected_total: CounterVec,
    /// End-to-end simulation latency, including the artificial delay.
    pub simulation_duration: HistogramVec,
    /// Last value written to the shared counter.
    pub shared_counter: IntGauge,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

fn init_err(e: prometheus::Error) -> DebuggerError {
    DebuggerError::Other(format!("metrics init failed: {e}"))
}

/// Initialise all Prometheus metrics and register them with a private registry.
///
/// Calling it a second time is a no-op (returns `Ok(())`).
///
/// # Errors
///
/// Returns [`DebuggerError::Other`] if metric construction or registration
/// fails.
pub fn init_metrics() -> Result<(), DebuggerError> {
    if METRICS.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let simulations_total = CounterVec::new(
        Opts::new("ipc_simulations_total", "Completed simulations"),
        &["kind"],
    )
    .map_err(init_err)?;
    registry
        .register(Box::new(simulations_total.clone()))
        .map_err(init_err)?;

    let rejected_total = CounterVec::new(
        Opts::new(
            "ipc_rejected_requests_total",
            "Requests rejected before simulating",
        ),
        &["kind"],
    )
    .map_err(init_err)?;
    registry
        .register(Box::new(rejected_total.clone()))
        .map_err(init_err)?;

    let simulation_duration = HistogramVec::new(
        HistogramOpts::new(
            "ipc_simulation_duration_seconds",
            "Simulation duration including artificial delay",
        )
        .buckets(vec![0.1, 0.25, 0.5, 0.8, 1.0, 1.2, 1.5, 2.0, 5.0]),
        &["kind"],
    )
    .map_err(init_err)?;
    registry
        .register(Box::new(simulation_duration.clone()))
        .map_err(init_err)?;

    let shared_counter = IntGauge::new(
        "ipc_shared_counter_value",
        "Last value written to the shared-memory counter",
    )
    .map_err(init_err)?;
    registry
        .register(Box::new(shared_counter.clone()))
        .map_err(init_err)?;

    // If another thread raced us, the first one wins; both bundles are identical.
    let _ = METRICS.set(Metrics {
        registry,
        simulations_total,
        rejected_total,
        simulation_duration,
        shared_counter,
    });

    Ok(())
}

fn metrics() -> Option<&'static Metrics> {
    METRICS.get()
}

/// Increment the completed-simulation counter for `kind`.
pub fn inc_simulation(kind: &str) {
    if let Some(m) = metrics() {
        if let Ok(c) = m.simulations_total.get_metric_with_label_values(&[kind]) {
            c.inc();
        }
    }
}

/// Increment the rejected-request counter for `kind`.
pub fn inc_rejected(kind: &str) {
    if let Some(m) = metrics() {
        if let Ok(c) = m.rejected_total.get_metric_with_label_values(&[kind]) {
            c.inc();
        }
    }
}

/// Record the end-to-end latency of one simulation.
pub fn record_simulation_latency(kind: &str, d: Duration) {
    if let Some(m) = metrics() {
        if let Ok(h) = m.simulation_duration.get_metric_with_label_values(&[kind]) {
            h.observe(d.as_secs_f64());
        }
    }
}

/// Publish the shared counter's latest value.
pub fn set_shared_counter(value: i64) {
    if let Some(m) = metrics() {
        m.shared_counter.set(value);
    }
}

/// Gather and encode all metrics in the Prometheus text exposition format.
///
/// Returns an empty string if metrics have not been initialised or if
/// encoding fails.
pub fn gather_metrics() -> String {
    let Some(m) = metrics() else {
        return String::new();
    };
    let families = m.registry.gather();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Completed simulation counts keyed by kind label.
///
/// Empty if metrics have not been initialised.
pub fn simulation_counts() -> HashMap<String, u64> {
    let mut out = HashMap::new();
    let Some(m) = metrics() else {
        return out;
    };
    for family in m.registry.gather() {
        if family.get_name() != "ipc_simulations_total" {
            continue;
        }
        for metric in family.get_metric() {
            let kind = metric
                .get_label()
                .iter()
                .find(|l| l.get_name() == "kind")
                .map_or("unknown", |l| l.get_value());
            out.insert(kind.to_string(), metric.get_counter().get_value() as u64);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics_is_idempotent() {
        assert!(init_metrics().is_ok());
        assert!(init_metrics().is_ok());
    }

    #[test]
    fn test_counters_appear_in_exposition() {
        init_metrics().expect("test: init");
        inc_simulation("pipes");
        inc_rejected("queue");
        record_simulation_latency("pipes", Duration::from_millis(1200));
        set_shared_counter(15);

        let text = gather_metrics();
        assert!(text.contains("ipc_simulations_total"));
        assert!(text.contains("ipc_rejected_requests_total"));
        assert!(text.contains("ipc_simulation_duration_seconds"));
        assert!(text.contains("ipc_shared_counter_value"));
    }

    #[test]
    fn test_simulation_counts_reports_incremented_kind() {
        init_metrics().expect("test: init");
        let before = simulation_counts().get("deadlock").copied().unwrap_or(0);
        inc_simulation("deadlock");
        let after = simulation_counts().get("deadlock").copied().unwrap_or(0);
        assert!(after > before);
    }
}
