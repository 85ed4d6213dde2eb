//! Configuration file loading.
//!
//! ## Responsibility
//! Read a TOML file from disk, parse it into a [`DebuggerConfig`], and run
//! validation before returning. This is the entry point both binaries use at
//! startup.
//!
//! ## Guarantees
//! - A successfully loaded config is always validated
//! - I/O errors and parse errors are distinguished in the error type
//! - File path is included in every error message

use std::path::Path;

use super::validation::{self, ConfigError};
use super::DebuggerConfig;

/// Load a [`DebuggerConfig`] from a TOML file.
///
/// # Returns
///
/// - `Ok(DebuggerConfig)` if the file is readable, well-formed, and valid.
/// - `Err(ConfigError::Io)` if the file cannot be read.
/// - `Err(ConfigError::Parse)` if the TOML is malformed.
/// - `Err(ConfigError::Validation)` if semantic constraints are violated.
///
/// # Example
///
/// ```rust,ignore
/// use ipc_debugger::config::loader::load_from_file;
/// use std::path::Path;
///
/// let config = load_from_file(Path::new("debugger.toml"))?;
/// println!("Listening on port {}", config.server.port);
/// ```
pub fn load_from_file(path: &Path) -> Result<DebuggerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        file: path.display().to_string(),
        source: e,
    })?;

    load_from_str(&content, &path.display().to_string())
}

/// Load a [`DebuggerConfig`] from a TOML string.
///
/// `source_name` identifies the source in error messages.
///
/// # Errors
///
/// `ConfigError::Parse` for malformed TOML, `ConfigError::Validation` when
/// semantic constraints fail.
pub fn load_from_str(content: &str, source_name: &str) -> Result<DebuggerConfig, ConfigError> {
    let config: DebuggerConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        file: source_name.to_string(),
        source: e,
    })?;

    validation::validate(&config).map_err(|errors| {
        ConfigError::Validation(
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    })?;

    Ok(config)
}

/// Load from `path` when given, otherwise return validated defaults.
///
/// # Errors
///
/// Same as [`load_from_file`].
pub fn load_or_default(path: Option<&Path>) -> Result<DebuggerConfig, ConfigError> {
    match path {
        Some(p) => load_from_file(p),
        None => Ok(DebuggerConfig::default()),
    }
}
