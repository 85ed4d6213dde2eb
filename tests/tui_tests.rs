//! Integration tests for the TUI console.
//!
//! Renders full frames into ratatui's `TestBackend` and checks what ends up
//! in the buffer, plus key-sequence driven state transitions.

#![cfg(feature = "tui")]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

use ipc_debugger::client::{ConsoleSnapshot, LogEntry};
use ipc_debugger::tui::app::{Action, App, InputMode};
use ipc_debugger::tui::events::{apply_event, translate_key};
use ipc_debugger::tui::theme::Theme;
use ipc_debugger::tui::ui;
use ipc_debugger::SimulationKind;

// ── Helpers ─────────────────────────────────────────────────────────────

fn buffer_text(buf: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn render(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test: terminal");
    terminal.draw(|f| ui::draw(f, app)).expect("test: draw");
    buffer_text(terminal.backend().buffer())
}

fn snapshot(lines: &[&str]) -> ConsoleSnapshot {
    ConsoleSnapshot {
        entries: lines.iter().map(|l| LogEntry::now(*l)).collect(),
        message: "Hello from the IPC Debugger!".to_string(),
        ..ConsoleSnapshot::default()
    }
}

fn press(app: &mut App, code: KeyCode) -> Option<Action> {
    let event = translate_key(KeyEvent::new(code, KeyModifiers::NONE), app.input_mode);
    apply_event(app, event)
}

// ── Rendering ───────────────────────────────────────────────────────────

#[test]
fn test_render_shows_controls_and_log() {
    let mut app = App::new(Theme::Neon);
    app.sync(snapshot(&["Processing through pipe..."]));
    let screen = render(&app, 120, 40);

    assert!(screen.contains("IPC Debugger"));
    assert!(screen.contains("Test Pipes"));
    assert!(screen.contains("Test Message Queue"));
    assert!(screen.contains("Test Shared Memory"));
    assert!(screen.contains("Simulate Deadlock"));
    assert!(screen.contains("Send Test Data"));
    assert!(screen.contains("Processing through pipe..."));
    assert!(screen.contains("Hello from the IPC Debugger!"));
}

#[test]
fn test_render_busy_label_while_loading() {
    let mut app = App::new(Theme::Ocean);
    let mut snap = snapshot(&[]);
    snap.loading.set(SimulationKind::Queue, true);
    snap.running = true;
    app.sync(snap);
    let screen = render(&app, 120, 40);

    assert!(screen.contains("Running Queue..."));
    assert!(!screen.contains("Test Message Queue"));
    assert!(screen.contains("Sending..."));
    assert!(screen.contains("RUNNING"));
}

#[test]
fn test_render_summary_counts() {
    let mut app = App::new(Theme::Mono);
    let mut snap = snapshot(&[]);
    for _ in 0..9 {
        snap.counters.increment(SimulationKind::Shared);
    }
    app.sync(snap);
    let screen = render(&app, 120, 40);

    assert!(screen.contains("RUN SUMMARY"));
    assert!(screen.contains("COUNTS"));
    // The grid shows the true count even though the bar saturates.
    assert!(screen.contains("     9"));
    assert!(screen.contains("messages 9"));
}

#[test]
fn test_render_too_small_guard() {
    let app = App::new(Theme::Neon);
    let screen = render(&app, 60, 20);
    assert!(screen.contains("Terminal too small"));
}

#[test]
fn test_render_help_overlay() {
    let mut app = App::new(Theme::Neon);
    app.show_help = true;
    let screen = render(&app, 120, 40);
    assert!(screen.contains("Help"));
    assert!(screen.contains("Cycle theme"));
}

#[test]
fn test_render_every_theme_without_panicking() {
    for theme in Theme::ALL {
        let mut app = App::new(theme);
        app.sync(snapshot(&["❌ Error: network error: boom", "✅ Simulation complete"]));
        let screen = render(&app, 100, 30);
        assert!(screen.contains(theme.name()));
    }
}

// ── Key sequences ───────────────────────────────────────────────────────

#[test]
fn test_edit_message_key_sequence() {
    let mut app = App::new(Theme::Neon);
    app.sync(snapshot(&[]));
    app.snapshot.message = "hi".to_string();

    assert_eq!(press(&mut app, KeyCode::Char('e')), None);
    assert_eq!(app.input_mode, InputMode::Editing);
    // Control keys type into the draft while editing.
    press(&mut app, KeyCode::Char('q'));
    press(&mut app, KeyCode::Char('1'));
    press(&mut app, KeyCode::Backspace);
    assert!(!app.should_quit);

    let action = press(&mut app, KeyCode::Enter);
    assert_eq!(action, Some(Action::SetMessage("hiq".to_string())));
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_trigger_keys_produce_actions() {
    let mut app = App::new(Theme::Neon);
    assert_eq!(
        press(&mut app, KeyCode::Char('4')),
        Some(Action::Trigger(SimulationKind::Deadlock))
    );
    assert_eq!(press(&mut app, KeyCode::Char('s')), Some(Action::RunAll));
    assert_eq!(press(&mut app, KeyCode::Char('c')), Some(Action::Clear));
    assert_eq!(press(&mut app, KeyCode::Char('q')), None);
    assert!(app.should_quit);
}

#[test]
fn test_scroll_then_clear_resets_offset() {
    let mut app = App::new(Theme::Neon);
    app.sync(snapshot(&["a", "b", "c", "d"]));
    press(&mut app, KeyCode::Up);
    press(&mut app, KeyCode::Up);
    assert_eq!(app.log_scroll_offset, 2);
    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.log_scroll_offset, 0);
}
