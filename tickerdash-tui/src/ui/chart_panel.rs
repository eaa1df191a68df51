//! Price chart: close, high and low over the selected range.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, LegendPosition, Paragraph};
use ratatui::Frame;

use tickerdash_core::chart::PriceChart;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(dash) = app.dashboard() else {
        return;
    };
    let chart = &dash.chart;
    let block = panel_block(&chart.title, false);

    if chart.lines.iter().all(|l| l.points.is_empty()) {
        let para = Paragraph::new(Line::from(Span::styled("No price data to chart.", theme::muted())))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let datasets: Vec<Dataset> = chart
        .lines
        .iter()
        .map(|line| {
            Dataset::default()
                .name(line.name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::line_color(line.color)))
                .data(&line.points)
        })
        .collect();

    let widget = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .title(Span::styled(chart.x_label, theme::muted()))
                .style(theme::muted())
                .bounds(chart.x_bounds)
                .labels(date_labels(chart)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(chart.y_label, theme::muted()))
                .style(theme::muted())
                .bounds(chart.y_bounds)
                .labels(vec![
                    Span::styled(format!("{:.2}", chart.y_bounds[0]), theme::muted()),
                    Span::styled(
                        format!("{:.2}", (chart.y_bounds[0] + chart.y_bounds[1]) / 2.0),
                        theme::muted(),
                    ),
                    Span::styled(format!("{:.2}", chart.y_bounds[1]), theme::muted()),
                ]),
        );

    f.render_widget(widget, area);
}

fn date_labels(chart: &PriceChart) -> Vec<Span<'static>> {
    [chart.first_date, chart.last_date]
        .into_iter()
        .map(|d| {
            let text = d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
            Span::styled(text, theme::muted())
        })
        .collect()
}
