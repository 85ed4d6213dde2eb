//! # Module: TUI Event Handling
//!
//! ## Responsibility
//! Polls crossterm events and translates keyboard input into app state
//! mutations and orchestrator [`Action`]s. Key meaning depends on
//! [`InputMode`]: in edit mode printable keys go to the message draft.
//!
//! ## Guarantees
//! - Non-blocking event polling with configurable timeout
//! - No panics on any key combination
//! - Ctrl+C always triggers quit, in either mode

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::SimulationKind;

use super::app::{Action, App, InputMode};

/// Result of polling for a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// q, Esc or Ctrl+C.
    Quit,
    /// 1 to 4.
    Trigger(SimulationKind),
    /// s.
    RunAll,
    /// c.
    Clear,
    /// e.
    Edit,
    /// t.
    CycleTheme,
    /// h.
    Help,
    /// Up arrow.
    ScrollUp,
    /// Down arrow.
    ScrollDown,
    /// Printable character while editing.
    Char(char),
    /// Backspace while editing.
    Backspace,
    /// Enter or Esc while editing.
    Submit,
    /// A terminal resize occurred.
    Resize(u16, u16),
    /// No actionable event within the poll window.
    None,
}

/// Polls for a single input event with the given timeout.
///
/// Returns `InputEvent::None` on timeout or on any crossterm polling error.
pub fn poll_event(timeout: Duration, mode: InputMode) -> InputEvent {
    let available = match event::poll(timeout) {
        Ok(v) => v,
        Err(_) => return InputEvent::None,
    };
    if !available {
        return InputEvent::None;
    }

    match event::read() {
        // Windows reports both press and release.
        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => translate_key(key, mode),
        Ok(Event::Resize(w, h)) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

/// Applies an input event to the app state.
///
/// Returns the orchestrator work the event implies, if any. While the help
/// overlay is open, any key other than quit just closes it.
pub fn apply_event(app: &mut App, event: InputEvent) -> Option<Action> {
    if app.show_help && !matches!(event, InputEvent::Quit | InputEvent::Resize(..) | InputEvent::None) {
        app.show_help = false;
        return None;
    }

    match event {
        InputEvent::Quit => {
            app.should_quit = true;
            None
        }
        InputEvent::Trigger(kind) => Some(Action::Trigger(kind)),
        InputEvent::RunAll => Some(Action::RunAll),
        InputEvent::Clear => {
            app.log_scroll_offset = 0;
            Some(Action::Clear)
        }
        InputEvent::Edit => {
            app.begin_editing();
            None
        }
        InputEvent::CycleTheme => {
            app.cycle_theme();
            None
        }
        InputEvent::Help => {
            app.show_help = true;
            None
        }
        InputEvent::ScrollUp => {
            app.scroll_log_up();
            None
        }
        InputEvent::ScrollDown => {
            app.scroll_log_down();
            None
        }
        InputEvent::Char(c) => {
            app.draft.push(c);
            None
        }
        InputEvent::Backspace => {
            app.draft.pop();
            None
        }
        InputEvent::Submit => Some(app.finish_editing()),
        InputEvent::Resize(_, _) | InputEvent::None => None,
    }
}

/// Translates a crossterm key event to an `InputEvent` for `mode`.
pub fn translate_key(key: KeyEvent, mode: InputMode) -> InputEvent {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputEvent::Quit;
    }

    match mode {
        InputMode::Editing => match key.code {
            KeyCode::Enter | KeyCode::Esc => InputEvent::Submit,
            KeyCode::Backspace => InputEvent::Backspace,
            KeyCode::Char(c) => InputEvent::Char(c),
            _ => InputEvent::None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputEvent::Quit,
            KeyCode::Char('1') => InputEvent::Trigger(SimulationKind::Pipes),
            KeyCode::Char('2') => InputEvent::Trigger(SimulationKind::Queue),
            KeyCode::Char('3') => InputEvent::Trigger(SimulationKind::Shared),
            KeyCode::Char('4') => InputEvent::Trigger(SimulationKind::Deadlock),
            KeyCode::Char('s') | KeyCode::Char('S') => InputEvent::RunAll,
            KeyCode::Char('c') | KeyCode::Char('C') => InputEvent::Clear,
            KeyCode::Char('e') | KeyCode::Char('E') => InputEvent::Edit,
            KeyCode::Char('t') | KeyCode::Char('T') => InputEvent::CycleTheme,
            KeyCode::Char('h') | KeyCode::Char('H') => InputEvent::Help,
            KeyCode::Up => InputEvent::ScrollUp,
            KeyCode::Down => InputEvent::ScrollDown,
            _ => InputEvent::None,
        },
    }
}
