//! Key metrics table: 13 fixed rows.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tickerdash_core::metrics::NOT_AVAILABLE;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(dash) = app.dashboard() else {
        return;
    };
    let focused = app.focus == Focus::Metrics;
    let block = panel_block("Key Metrics [m]export", focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = dash.metrics.rows();
    let visible = inner.height as usize;
    let start = app.metrics_scroll.min(rows.len());
    let end = (start + visible).min(rows.len());

    let lines: Vec<Line> = rows[start..end]
        .iter()
        .map(|row| {
            let value_style = if row.value == NOT_AVAILABLE {
                theme::muted()
            } else {
                theme::text()
            };
            Line::from(vec![
                Span::styled(format!("{:<17}", row.name), theme::accent()),
                Span::styled(format!("{:>14}", row.value), value_style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
