//! # Module: TUI App State
//!
//! ## Responsibility
//! Owns view-only state for the console: quit/help flags, the message draft
//! while editing, log scroll position, the active theme and the latest
//! [`ConsoleSnapshot`] pulled from the orchestrator. Anything that talks to
//! the simulation server is returned as an [`Action`] for the caller to run.
//!
//! ## Guarantees
//! - No method touches the network or spawns tasks
//! - Scroll offset never exceeds the number of log entries
//! - Leaving edit mode always yields exactly one `SetMessage` action

use std::time::{Duration, Instant};

use crate::client::ConsoleSnapshot;
use crate::SimulationKind;

use super::theme::Theme;

/// Minimum terminal width for the console to render.
pub const MIN_COLS: u16 = 80;

/// Minimum terminal height for the console to render.
pub const MIN_ROWS: u16 = 24;

/// Whether keystrokes drive controls or the message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys map to controls.
    #[default]
    Normal,
    /// Keys edit the message draft.
    Editing,
}

/// Work the event loop must hand to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fire one simulation.
    Trigger(SimulationKind),
    /// Fire all four on the run-all schedule.
    RunAll,
    /// Empty the log.
    Clear,
    /// Commit the edited message.
    SetMessage(String),
}

/// Primary application state for the console.
#[derive(Debug)]
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Message being edited; only meaningful in [`InputMode::Editing`].
    pub draft: String,
    /// Lines scrolled up from the newest entry. Zero follows the tail.
    pub log_scroll_offset: usize,
    /// Active colour theme.
    pub theme: Theme,
    /// Latest orchestrator state.
    pub snapshot: ConsoleSnapshot,
    started_at: Instant,
}

impl App {
    /// Fresh state using `theme`.
    pub fn new(theme: Theme) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            draft: String::new(),
            log_scroll_offset: 0,
            theme,
            snapshot: ConsoleSnapshot::default(),
            started_at: Instant::now(),
        }
    }

    /// Replace the displayed state, keeping the scroll offset in range.
    pub fn sync(&mut self, snapshot: ConsoleSnapshot) {
        self.snapshot = snapshot;
        self.log_scroll_offset = self
            .log_scroll_offset
            .min(self.snapshot.entries.len().saturating_sub(1));
    }

    /// Time since the app was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Uptime as `HH:MM:SS`.
    pub fn uptime_display(&self) -> String {
        format_hms(self.uptime().as_secs())
    }

    /// Successful calls across all kinds.
    pub fn total_messages(&self) -> u64 {
        self.snapshot.counters.total()
    }

    /// Label for `kind`'s control in its current state.
    pub fn control_label(&self, kind: SimulationKind) -> &'static str {
        if self.snapshot.loading.get(kind) {
            kind.busy_label()
        } else {
            kind.trigger_label()
        }
    }

    /// Scroll one line towards older entries.
    pub fn scroll_log_up(&mut self) {
        let max = self.snapshot.entries.len().saturating_sub(1);
        self.log_scroll_offset = (self.log_scroll_offset + 1).min(max);
    }

    /// Scroll one line towards the newest entry.
    pub fn scroll_log_down(&mut self) {
        self.log_scroll_offset = self.log_scroll_offset.saturating_sub(1);
    }

    /// Enter edit mode, seeding the draft with the current message.
    pub fn begin_editing(&mut self) {
        self.draft = self.snapshot.message.clone();
        self.input_mode = InputMode::Editing;
    }

    /// Leave edit mode and hand back the draft for the orchestrator.
    pub fn finish_editing(&mut self) -> Action {
        self.input_mode = InputMode::Normal;
        let message = std::mem::take(&mut self.draft);
        // Show the new message immediately; the next sync confirms it.
        self.snapshot.message = message.clone();
        Action::SetMessage(message)
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
    }
}

/// Format whole seconds as `HH:MM:SS`. Hours do not wrap.
pub fn format_hms(secs: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
