//! # Widget: Log Console
//!
//! ## Responsibility
//! Renders the console log, newest at the bottom, honouring the app's scroll
//! offset. Lines are coloured by their leading marker.
//!
//! ## Guarantees
//! - Fixed-width timestamp column for alignment
//! - Long lines truncated with `…` on a character boundary rather than wrapping
//! - Handles an empty log gracefully

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::client::LogEntry;
use crate::tui::app::App;
use crate::tui::theme::Palette;

/// Colour for a log line, chosen by its leading marker.
pub fn line_color(text: &str, palette: &Palette) -> Color {
    if text.starts_with('❌') || text.starts_with('🔴') {
        palette.error
    } else if text.starts_with('⚠') {
        palette.busy
    } else if text.starts_with('✅') || text.starts_with('💡') {
        palette.success
    } else if text.starts_with('🧪')
        || text.starts_with('📤')
        || text.starts_with('🚀')
        || text.starts_with('🧹')
    {
        palette.accent
    } else {
        palette.text
    }
}

/// Truncates a string to a maximum width in characters, adding `…` if
/// truncated.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    if max_width == 1 {
        return "\u{2026}".to_string();
    }
    let mut out: String = s.chars().take(max_width - 1).collect();
    out.push('\u{2026}');
    out
}

/// The slice of `entries` visible in `height` rows after scrolling
/// `offset` lines up from the tail.
pub fn visible_window(entries: &[LogEntry], height: usize, offset: usize) -> &[LogEntry] {
    let end = entries.len().saturating_sub(offset);
    let start = end.saturating_sub(height);
    &entries[start..end]
}

/// Renders the log console widget.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let title = if app.log_scroll_offset > 0 {
        format!(" CONSOLE (\u{2191}{}) ", app.log_scroll_offset)
    } else {
        " CONSOLE ".to_string()
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(palette.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let entries = visible_window(
        &app.snapshot.entries,
        inner.height as usize,
        app.log_scroll_offset,
    );
    let max_line_width = inner.width as usize;

    let lines: Vec<Line> = entries
        .iter()
        .map(|entry| {
            let stamp = format!("[{}] ", entry.clock());
            let remaining = max_line_width.saturating_sub(stamp.chars().count());
            Line::from(vec![
                Span::styled(stamp, Style::default().fg(palette.muted)),
                Span::styled(
                    truncate_with_ellipsis(&entry.text, remaining),
                    Style::default().fg(line_color(&entry.text, &palette)),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
