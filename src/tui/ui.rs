//! # Module: TUI Rendering
//!
//! ## Responsibility
//! Divides the terminal into header, controls, console and summary regions
//! and delegates to the widget renderers. Handles the minimum size guard and
//! the help overlay.
//!
//! ## Guarantees
//! - Minimum size guard displays a centered message if terminal is too small
//! - No panics during rendering regardless of terminal dimensions

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, MIN_COLS, MIN_ROWS};
use super::theme::Palette;
use super::widgets;

const HELP_WIDTH: u16 = 52;
const HELP_HEIGHT: u16 = 18;

/// Renders the complete console UI into the given frame.
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();
    let palette = app.theme.palette();

    if size.width < MIN_COLS || size.height < MIN_ROWS {
        draw_too_small(f, size, &palette);
        return;
    }

    let outer_block = Block::default()
        .title(Span::styled(
            " IPC Debugger ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            " [1-4] run  [s]end all  [c]lear  [e]dit  [t]heme  [h]elp  [q]uit ",
            Style::default().fg(palette.muted),
        )))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    let inner = outer_block.inner(size);
    f.render_widget(outer_block, size);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status line
            Constraint::Min(12),   // Controls + console
            Constraint::Length(9), // Summary
        ])
        .split(inner);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(main_chunks[1]);

    f.render_widget(Paragraph::new(status_line(app, &palette)), main_chunks[0]);
    widgets::controls::render(f, body_chunks[0], app);
    widgets::log::render(f, body_chunks[1], app);
    widgets::summary::render(f, main_chunks[2], app);

    if app.show_help {
        draw_help_overlay(f, size, &palette);
    }
}

/// Uptime, message total, theme and run-all state on one line.
pub fn status_line<'a>(app: &App, palette: &Palette) -> Line<'a> {
    let mut spans = vec![
        Span::styled(" uptime ", Style::default().fg(palette.muted)),
        Span::styled(app.uptime_display(), Style::default().fg(palette.text)),
        Span::styled("   messages ", Style::default().fg(palette.muted)),
        Span::styled(
            app.total_messages().to_string(),
            Style::default().fg(palette.text),
        ),
        Span::styled("   theme ", Style::default().fg(palette.muted)),
        Span::styled(app.theme.name(), Style::default().fg(palette.accent)),
    ];
    if app.snapshot.running {
        spans.push(Span::styled(
            "   RUNNING",
            Style::default()
                .fg(palette.busy)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

/// Centered rectangle for a popup of at most `width`×`height` inside `area`.
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

fn draw_too_small(f: &mut Frame, area: Rect, palette: &Palette) {
    let msg = format!("Terminal too small: resize to at least {MIN_COLS}x{MIN_ROWS}");
    let current_size = format!("Current size: {}x{}", area.width, area.height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.error));

    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            msg,
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(current_size, Style::default().fg(palette.muted))),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(para, area);
}

fn draw_help_overlay(f: &mut Frame, area: Rect, palette: &Palette) {
    let popup = popup_area(area, HELP_WIDTH, HELP_HEIGHT);
    f.render_widget(Clear, popup);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("    {k:<10}"), Style::default().fg(palette.accent)),
            Span::styled(what, Style::default().fg(palette.text)),
        ])
    };

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  IPC Debugger console",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("[1]-[4]", "Pipes / Queue / Shared / Deadlock"),
        key("[s]", "Send to all four, staggered"),
        key("[c]", "Clear the console"),
        key("[e]", "Edit message (Enter/Esc to save)"),
        key("[t]", "Cycle theme"),
        key("[\u{2191}\u{2193}]", "Scroll console"),
        key("[h]", "Toggle this help"),
        key("[q] [Esc]", "Quit"),
        key("[Ctrl+C]", "Force quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  Press any key to close",
            Style::default().fg(palette.busy),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));

    f.render_widget(Paragraph::new(help_text).block(block), popup);
}
