//! Ticker field and range selector.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use ratatui::Frame;

use tickerdash_core::domain::TimeRange;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(area);

    render_ticker_field(f, chunks[0], app);
    render_range_tabs(f, chunks[1], app);
}

fn render_ticker_field(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Ticker;
    let mut spans = vec![
        Span::styled("> ", theme::accent()),
        Span::styled(app.ticker_input.as_str(), theme::accent_bold()),
    ];
    if focused {
        spans.push(Span::styled("_", theme::accent()));
    }
    if app.is_loading() {
        spans.push(Span::styled("  loading", theme::neutral()));
    }

    let para = Paragraph::new(Line::from(spans)).block(panel_block("Ticker [Enter]load", focused));
    f.render_widget(para, area);
}

fn render_range_tabs(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Range;
    let titles: Vec<Line> = TimeRange::ALL
        .iter()
        .map(|r| Line::from(r.label()))
        .collect();

    let tabs = Tabs::new(titles)
        .block(panel_block("Time Range [h/l]", focused))
        .select(app.range.index())
        .style(theme::muted())
        .highlight_style(theme::accent_bold().add_modifier(Modifier::REVERSED))
        .divider(Span::styled("|", theme::muted()));
    f.render_widget(tabs, area);
}
