//! Simulation server for the IPC Debugger.
//!
//! Serves `POST /api/{pipes,queue,shared,deadlock}` plus `/health`,
//! `/metrics` and `/api/schema`.
//!
//! ## Usage
//! ```bash
//! ipc-debugger                          # defaults, 0.0.0.0:3000
//! ipc-debugger --config debugger.toml   # load a TOML config
//! ipc-debugger --port 8080              # override the port
//! ipc-debugger --print-schema           # dump the config JSON Schema and exit
//! ```
//!
//! ## Environment Variables
//!
//! - `LOG_FORMAT=json`: structured JSON output (overrides the config file)
//! - `RUST_LOG=info`: log level filter

use std::path::PathBuf;

use clap::Parser;
use ipc_debugger::config::validation::ConfigError;
use ipc_debugger::config::{self, loader};
use ipc_debugger::{init_tracing, metrics, server, DebuggerError, Simulator};
use tracing::{info, warn};

/// Command-line arguments for the simulation server.
#[derive(Debug, Parser)]
#[command(name = "ipc-debugger", version, about = "Scripted IPC simulation server")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Override `server.port`.
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the config JSON Schema and exit.
    #[arg(long)]
    print_schema: bool,
}

#[tokio::main]
async fn main() -> Result<(), DebuggerError> {
    let cli = Cli::parse();

    if cli.print_schema {
        let schema = config::export_schema()
            .map_err(|e| DebuggerError::Other(format!("schema export failed: {e}")))?;
        println!("{schema}");
        return Ok(());
    }

    let mut cfg = loader::load_or_default(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        cfg.server.host = host;
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }
    if let Err(errors) = config::validation::validate(&cfg) {
        for e in &errors {
            eprintln!("config error: {e}");
        }
        return Err(ConfigError::Validation(format!(
            "{} configuration error(s)",
            errors.len()
        ))
        .into());
    }

    if let Err(e) = init_tracing(cfg.observability.log_format) {
        eprintln!("{e}");
    }

    if cfg.observability.metrics_enabled {
        metrics::init_metrics()?;
    } else {
        warn!("metrics disabled; /metrics will be empty");
    }

    let simulator = Simulator::new(cfg.simulation.clone());
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        "starting IPC debugger"
    );

    server::start_server(cfg.server, simulator).await?;

    info!(counts = ?metrics::simulation_counts(), "server stopped");
    Ok(())
}
