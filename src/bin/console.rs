//! # Binary: IPC Console
//!
//! ## Responsibility
//! Front end for a running `ipc-debugger` server. Drives an [`Orchestrator`]
//! either from the interactive terminal console or headlessly, printing each
//! log line to stdout.
//!
//! ## Usage
//! ```bash
//! ipc-console                                  # interactive console
//! ipc-console --theme ocean tui
//! ipc-console --message ping run pipes         # one simulation, then exit
//! ipc-console run-all                          # all four, staggered, then exit
//! ipc-console --url http://10.0.0.5:3000 run-all
//! ```
//!
//! ## Guarantees
//! - Terminal state always restored on exit, even on panic
//! - Clean shutdown on q, Esc, or Ctrl+C
//! - Headless runs exit only after every revealed line has been printed

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use ipc_debugger::config::validation::ConfigError;
use ipc_debugger::config::{self, loader};
use ipc_debugger::tui::app::{Action, App};
use ipc_debugger::tui::events::{apply_event, poll_event};
use ipc_debugger::tui::theme::Theme;
use ipc_debugger::tui::ui;
use ipc_debugger::{
    init_tracing_with_writer, ConsoleEvent, DebuggerError, HttpSimulationApi, Orchestrator,
    SimulationApi,
};
use ipc_debugger::SimulationKind;

/// Render refresh rate: 10 frames per second.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Command-line arguments for the console.
#[derive(Debug, Parser)]
#[command(name = "ipc-console", version, about = "Console for the IPC simulation server")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override `client.base_url`.
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Override the initial message.
    #[arg(short, long, global = true)]
    message: Option<String>,

    /// Colour theme for the interactive console.
    #[arg(short, long, default_value = "neon", global = true)]
    theme: Theme,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal console (default).
    Tui,
    /// Run one simulation and print its log.
    Run {
        /// pipes, queue, shared or deadlock.
        kind: SimulationKind,
    },
    /// Run all four on the staggered schedule and print the log.
    RunAll,
}

/// What a headless run waits on before draining output.
enum Headless {
    One(SimulationKind),
    All,
}

fn main() -> Result<(), DebuggerError> {
    let cli = Cli::parse();

    let mut cfg = loader::load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        cfg.client.base_url = url;
    }
    if let Some(message) = cli.message {
        cfg.client.default_message = message;
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

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    // Orchestrator spawns onto this runtime from the synchronous UI loop.
    let _guard = rt.enter();

    let api: Arc<dyn SimulationApi> = Arc::new(
        HttpSimulationApi::new(cfg.client.base_url.clone())
            .with_timeout(cfg.client.request_timeout()),
    );
    let orchestrator = Orchestrator::new(api, &cfg.client);
    // A line is revealed every stride; a longer silence means the run is over.
    let idle = cfg.client.reveal_stride() * 2 + Duration::from_millis(250);

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_interactive(&orchestrator, cli.theme),
        Command::Run { kind } => {
            // stdout carries the log lines themselves.
            let _ = init_tracing_with_writer(cfg.observability.log_format, io::stderr);
            rt.block_on(run_headless(
                &orchestrator,
                Headless::One(kind),
                cfg.client.run_all_settle(),
                idle,
            ));
            Ok(())
        }
        Command::RunAll => {
            let _ = init_tracing_with_writer(cfg.observability.log_format, io::stderr);
            rt.block_on(run_headless(
                &orchestrator,
                Headless::All,
                cfg.client.run_all_settle(),
                idle,
            ));
            Ok(())
        }
    }
}

// ============================================================================
// Interactive
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_interactive(
    orchestrator: &Orchestrator,
    theme: Theme,
) -> Result<(), DebuggerError> {
    // Install panic hook that restores terminal before printing panic message
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, orchestrator, theme);
    restore_terminal(&mut terminal)?;

    if let Err(e) = result {
        eprintln!("console error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    orchestrator: &Orchestrator,
    theme: Theme,
) -> Result<(), DebuggerError> {
    let mut app = App::new(theme);

    loop {
        app.sync(orchestrator.snapshot());
        terminal.draw(|f| ui::draw(f, &app))?;

        let event = poll_event(TICK_RATE, app.input_mode);
        if let Some(action) = apply_event(&mut app, event) {
            dispatch(orchestrator, action);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn dispatch(orchestrator: &Orchestrator, action: Action) {
    match action {
        // Busy kinds and an active run-all ignore the request.
        Action::Trigger(kind) => {
            let _ = orchestrator.trigger(kind);
        }
        Action::RunAll => {
            let _ = orchestrator.run_all();
        }
        Action::Clear => orchestrator.clear(),
        Action::SetMessage(message) => orchestrator.set_message(message),
    }
}

// ============================================================================
// Headless
// ============================================================================

async fn run_headless(orchestrator: &Orchestrator, work: Headless, settle: Duration, idle: Duration) {
    let mut rx = orchestrator.subscribe();

    // Startup line predates the subscription.
    for entry in orchestrator.snapshot().entries {
        println!("{entry}");
    }

    let finished = async {
        match work {
            Headless::One(kind) => {
                if let Some(handle) = orchestrator.trigger(kind) {
                    if let Err(e) = handle.await {
                        warn!(error = %e, "simulation task failed");
                    }
                }
            }
            Headless::All => {
                orchestrator.run_all();
                tokio::time::sleep(settle).await;
                while orchestrator.snapshot().loading.any() {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            }
        }
    };
    tokio::pin!(finished);

    let mut done = false;
    loop {
        tokio::select! {
            _ = &mut finished, if !done => done = true,
            event = tokio::time::timeout(idle, rx.recv()) => match event {
                Ok(Ok(ConsoleEvent::Appended(entry))) => println!("{entry}"),
                Ok(Ok(ConsoleEvent::Cleared)) => {}
                Ok(Err(RecvError::Lagged(n))) => warn!(skipped = n, "console output lagged"),
                Ok(Err(RecvError::Closed)) => break,
                Err(_) if done => break,
                Err(_) => {}
            },
        }
    }
}
