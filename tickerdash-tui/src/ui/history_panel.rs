//! Historical data table, one row per trading day.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tickerdash_core::domain::PriceBar;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(dash) = app.dashboard() else {
        return;
    };
    let focused = app.focus == Focus::History;
    let series = &dash.series;
    let title = format!("Historical Data ({} rows) [j/k]scroll [x]export", series.len());
    let block = panel_block(&title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(
            "{:<10} {:>10} {:>10} {:>10} {:>10} {:>13} {:>9} {:>6}",
            "Date", "Open", "High", "Low", "Close", "Volume", "Dividends", "Splits"
        ),
        theme::accent_bold(),
    )));

    let visible = inner.height.saturating_sub(1) as usize;
    let start = app.history_scroll.min(series.len());
    let end = (start + visible).min(series.len());
    for bar in &series[start..end] {
        lines.push(Line::from(Span::styled(row_text(bar), theme::text())));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn row_text(bar: &PriceBar) -> String {
    format!(
        "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>13} {:>9.2} {:>6}",
        bar.date_label(),
        bar.open,
        bar.high,
        bar.low,
        bar.close,
        bar.volume,
        bar.dividends,
        bar.stock_splits,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn row_columns_line_up_with_header() {
        let bar = PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            open: 175.57,
            high: 177.71,
            low: 173.52,
            close: 173.72,
            volume: 75_604_200,
            dividends: 0.24,
            stock_splits: 0.0,
        };
        let row = row_text(&bar);
        assert!(row.starts_with("2024-03-18 "));
        assert!(row.contains("173.72"));
        assert!(row.contains("75604200"));
        assert_eq!(row.len(), 10 + 4 * 11 + 14 + 10 + 7);
    }
}
