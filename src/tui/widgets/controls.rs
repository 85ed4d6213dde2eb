//! # Widget: Controls
//!
//! ## Responsibility
//! Renders the four trigger controls, the run-all and clear controls, and the
//! message input box.
//!
//! ## Guarantees
//! - A control shows its busy label exactly while its kind is loading
//! - Run-all shows as busy while a run-all is in progress

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::{App, InputMode};
use crate::SimulationKind;

/// Label for the run-all control.
pub fn run_all_label(running: bool) -> &'static str {
    if running {
        "Sending..."
    } else {
        "Send Test Data"
    }
}

/// Renders the controls panel.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(3)])
        .split(area);

    render_buttons(f, chunks[0], app);
    render_message(f, chunks[1], app);
}

fn render_buttons(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let block = Block::default()
        .title(Span::styled(" CONTROLS ", Style::default().fg(palette.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let mut lines = Vec::with_capacity(8);
    for (i, kind) in SimulationKind::ALL.into_iter().enumerate() {
        let busy = app.snapshot.loading.get(kind);
        let style = if busy {
            Style::default().fg(palette.busy).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" [{}] ", i + 1), Style::default().fg(palette.muted)),
            Span::styled(app.control_label(kind), style),
        ]));
    }

    lines.push(Line::from(""));
    let run_style = if app.snapshot.running {
        Style::default().fg(palette.busy).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.accent)
    };
    lines.push(Line::from(vec![
        Span::styled(" [s] ", Style::default().fg(palette.muted)),
        Span::styled(run_all_label(app.snapshot.running), run_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" [c] ", Style::default().fg(palette.muted)),
        Span::styled("Clear Output", Style::default().fg(palette.text)),
    ]));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_message(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let editing = app.input_mode == InputMode::Editing;
    let (title, body, border) = if editing {
        (
            " MESSAGE (Enter to save) ",
            format!("{}\u{258f}", app.draft),
            palette.accent,
        )
    } else {
        (" MESSAGE [e] ", app.snapshot.message.clone(), palette.border)
    };

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(palette.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let para = Paragraph::new(Span::styled(body, Style::default().fg(palette.text))).block(block);
    f.render_widget(para, area);
}
