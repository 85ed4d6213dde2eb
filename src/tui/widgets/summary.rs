//! # Widget: Run Summary
//!
//! ## Responsibility
//! Renders per-kind success counts twice: a bar chart whose bars saturate at
//! [`BAR_CLAMP`], and an exact count grid beside it.
//!
//! ## Guarantees
//! - Bar heights never exceed [`BAR_CLAMP`]; the grid always shows true counts

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

use crate::client::InvocationCounters;
use crate::tui::app::App;
use crate::SimulationKind;

/// Bars saturate at this count.
pub const BAR_CLAMP: u64 = 6;

/// Bar heights in [`SimulationKind::ALL`] order.
pub fn bar_values(counters: &InvocationCounters) -> [u64; 4] {
    let mut out = [0; 4];
    for (kind, count) in counters.iter() {
        out[kind.index()] = count.min(BAR_CLAMP);
    }
    out
}

/// Renders the summary panel.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let values = bar_values(&app.snapshot.counters);
    let bars: Vec<Bar> = SimulationKind::ALL
        .into_iter()
        .map(|kind| {
            let color = palette.bars[kind.index()];
            Bar::default()
                .value(values[kind.index()])
                .label(Line::from(kind.title()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(palette.text).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(" RUN SUMMARY ", Style::default().fg(palette.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2)
        .max(BAR_CLAMP);
    f.render_widget(chart, chunks[0]);

    let mut lines: Vec<Line> = app
        .snapshot
        .counters
        .iter()
        .map(|(kind, count)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<10}", kind.title()),
                    Style::default().fg(palette.bars[kind.index()]),
                ),
                Span::styled(format!("{count:>6}"), Style::default().fg(palette.text)),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<10}", "Total"), Style::default().fg(palette.muted)),
        Span::styled(
            format!("{:>6}", app.total_messages()),
            Style::default().fg(palette.accent),
        ),
    ]));

    let grid = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" COUNTS ", Style::default().fg(palette.accent)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    );
    f.render_widget(grid, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_values_zero() {
        assert_eq!(bar_values(&InvocationCounters::default()), [0, 0, 0, 0]);
    }

    #[test]
    fn test_bar_values_clamped_at_six() {
        let mut c = InvocationCounters::default();
        for _ in 0..9 {
            c.increment(SimulationKind::Queue);
        }
        c.increment(SimulationKind::Deadlock);
        assert_eq!(bar_values(&c), [0, BAR_CLAMP, 0, 1]);
        assert_eq!(c.get(SimulationKind::Queue), 9);
    }
}
