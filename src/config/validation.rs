//! Configuration validation engine.
//!
//! ## Responsibility
//! Validate semantic constraints on a parsed [`DebuggerConfig`] that cannot
//! be expressed through the type system alone (range checks, ordering of the
//! run-all schedule, URL shape).
//!
//! ## Guarantees
//! - Every validation rule has at least one test that triggers it
//! - Validation collects *all* errors before returning (no short-circuit)
//! - Error messages include the field path and the invalid value
//!
//! ## NOT Responsible For
//! - Parsing TOML (that belongs to `loader`)
//! - File I/O (that belongs to `loader`)

use super::DebuggerConfig;

/// Upper bound for any artificial endpoint delay.
pub const MAX_DELAY_MS: u64 = 60_000;

/// Upper bound for the per-line reveal stride.
pub const MAX_REVEAL_STRIDE_MS: u64 = 5_000;

/// Errors arising from configuration parsing, validation, or I/O.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("Parse error in {file}: {source}")]
    Parse {
        /// Path of the file that failed to parse.
        file: String,
        /// Underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// One or more semantic validation rules failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A specific field has an out-of-range or contradictory value.
    #[error("Field '{field}' has invalid value {value}: {reason}")]
    InvalidField {
        /// Dot-separated field path (e.g., "client.reveal_stride_ms").
        field: String,
        /// String representation of the invalid value.
        value: String,
        /// Human-readable explanation of the constraint.
        reason: String,
    },

    /// File I/O error.
    #[error("IO error reading {file}: {source}")]
    Io {
        /// Path of the file that could not be read.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.into(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Validate all semantic constraints on a [`DebuggerConfig`].
///
/// Collects every violation before returning so the caller sees the full
/// scope of issues at once.
///
/// # Errors
///
/// Returns every violated rule as a [`ConfigError::InvalidField`].
///
/// # Panics
///
/// This function never panics.
pub fn validate(config: &DebuggerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // ── Server ───────────────────────────────────────────────────────
    if config.server.host.trim().is_empty() {
        errors.push(invalid("server.host", "", "host must not be empty"));
    }

    if config.server.port == 0 {
        errors.push(invalid("server.port", 0, "port must be at least 1"));
    }

    if config.server.max_request_size == 0 {
        errors.push(invalid(
            "server.max_request_size",
            0,
            "request size limit must be at least 1 byte",
        ));
    }

    // ── Simulation delays ────────────────────────────────────────────
    let delays = [
        ("simulation.pipes_delay_ms", config.simulation.pipes_delay_ms),
        ("simulation.queue_delay_ms", config.simulation.queue_delay_ms),
        ("simulation.shared_delay_ms", config.simulation.shared_delay_ms),
        ("simulation.deadlock_delay_ms", config.simulation.deadlock_delay_ms),
    ];
    for (field, ms) in delays {
        if ms > MAX_DELAY_MS {
            errors.push(invalid(field, ms, "delay must be at most 60000ms"));
        }
    }

    if config.simulation.shared_increment == 0 {
        errors.push(invalid(
            "simulation.shared_increment",
            0,
            "increment must be non-zero",
        ));
    }

    // ── Client ───────────────────────────────────────────────────────
    let url = config.client.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(invalid(
            "client.base_url",
            &config.client.base_url,
            "base URL must start with http:// or https://",
        ));
    }

    if config.client.reveal_stride_ms > MAX_REVEAL_STRIDE_MS {
        errors.push(invalid(
            "client.reveal_stride_ms",
            config.client.reveal_stride_ms,
            "reveal stride must be at most 5000ms",
        ));
    }

    if config.client.request_timeout_ms == 0 {
        errors.push(invalid(
            "client.request_timeout_ms",
            0,
            "request timeout must be at least 1ms",
        ));
    }

    let offsets = &config.client.run_all_offsets_ms;
    if offsets.len() != 4 {
        errors.push(invalid(
            "client.run_all_offsets_ms",
            format!("{offsets:?}"),
            "exactly four offsets are required (pipes, queue, shared, deadlock)",
        ));
    } else if offsets.windows(2).any(|w| w[0] > w[1]) {
        errors.push(invalid(
            "client.run_all_offsets_ms",
            format!("{offsets:?}"),
            "offsets must be non-decreasing",
        ));
    }

    if let Some(last) = offsets.iter().max() {
        if config.client.run_all_settle_ms < *last {
            errors.push(invalid(
                "client.run_all_settle_ms",
                config.client.run_all_settle_ms,
                "settle offset must not precede the last scheduled call",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: &ConfigError) -> &str {
        match err {
            ConfigError::InvalidField { field, .. } => field,
            _ => "",
        }
    }

    fn assert_single_violation(config: &DebuggerConfig, field: &str) {
        let errors = validate(config).expect_err("test: config should be rejected");
        assert_eq!(errors.len(), 1, "expected one violation, got {errors:?}");
        assert_eq!(field_of(&errors[0]), field);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&DebuggerConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_host_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.server.host = "  ".into();
        assert_single_violation(&cfg, "server.host");
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.server.port = 0;
        assert_single_violation(&cfg, "server.port");
    }

    #[test]
    fn test_zero_request_size_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.server.max_request_size = 0;
        assert_single_violation(&cfg, "server.max_request_size");
    }

    #[test]
    fn test_excessive_delay_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.simulation.deadlock_delay_ms = MAX_DELAY_MS + 1;
        assert_single_violation(&cfg, "simulation.deadlock_delay_ms");
    }

    #[test]
    fn test_zero_delay_allowed() {
        let mut cfg = DebuggerConfig::default();
        cfg.simulation.pipes_delay_ms = 0;
        cfg.simulation.shared_delay_ms = 0;
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_zero_increment_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.simulation.shared_increment = 0;
        assert_single_violation(&cfg, "simulation.shared_increment");
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.client.base_url = "ftp://example.com".into();
        assert_single_violation(&cfg, "client.base_url");
    }

    #[test]
    fn test_excessive_stride_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.client.reveal_stride_ms = MAX_REVEAL_STRIDE_MS + 1;
        assert_single_violation(&cfg, "client.reveal_stride_ms");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.client.request_timeout_ms = 0;
        assert_single_violation(&cfg, "client.request_timeout_ms");
    }

    #[test]
    fn test_wrong_offset_count_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.client.run_all_offsets_ms = vec![500, 2500, 4500];
        assert_single_violation(&cfg, "client.run_all_offsets_ms");
    }

    #[test]
    fn test_decreasing_offsets_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.client.run_all_offsets_ms = vec![500, 4500, 2500, 6500];
        assert_single_violation(&cfg, "client.run_all_offsets_ms");
    }

    #[test]
    fn test_settle_before_last_offset_rejected() {
        let mut cfg = DebuggerConfig::default();
        cfg.client.run_all_settle_ms = 6000;
        assert_single_violation(&cfg, "client.run_all_settle_ms");
    }

    #[test]
    fn test_all_violations_collected() {
        let mut cfg = DebuggerConfig::default();
        cfg.server.port = 0;
        cfg.simulation.shared_increment = 0;
        cfg.client.request_timeout_ms = 0;
        let errors = validate(&cfg).expect_err("test: rejected");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_invalid_field_message_contains_path_and_value() {
        let err = invalid("server.port", 0, "port must be at least 1");
        let msg = err.to_string();
        assert!(msg.contains("server.port"));
        assert!(msg.contains('0'));
    }
}
