//! Top-level UI layout: input bar, two-column dashboard, status bar.

pub mod chart_panel;
pub mod company_panel;
pub mod history_panel;
pub mod input_bar;
pub mod metrics_panel;
pub mod overlays;
pub mod quote_header;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Overlay, View};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.area());

    input_bar::render(f, chunks[0], app);

    match &app.view {
        View::Ready(_) => draw_dashboard(f, chunks[1], app),
        View::Idle => draw_notice(
            f,
            chunks[1],
            "Enter a ticker symbol and press Enter to load the dashboard.",
            theme::muted(),
        ),
        View::Empty(msg) => draw_notice(f, chunks[1], msg, theme::warning()),
        View::Failed(msg) => draw_notice(f, chunks[1], msg, theme::negative()),
    }

    status_bar::render(f, chunks[2], app);

    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, chunks[1]),
        Overlay::Help => overlays::render_help(f, chunks[1]),
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[1], app),
        Overlay::None => {}
    }
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(12),
        ])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(16), Constraint::Min(5)])
        .split(columns[1]);

    quote_header::render(f, left[0], app);
    chart_panel::render(f, left[1], app);
    history_panel::render(f, left[2], app);
    metrics_panel::render(f, right[0], app);
    company_panel::render(f, right[1], app);
}

fn draw_notice(f: &mut Frame, area: Rect, message: &str, style: ratatui::style::Style) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(" TickerDash ")
        .title_style(style);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), style)),
    ];
    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

/// Bordered block whose colours follow focus.
pub fn panel_block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(format!(" {title} "))
        .title_style(theme::panel_title(focused))
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use tickerdash_core::data::StaticProvider;
    use tickerdash_core::domain::{Ticker, TimeRange};
    use tickerdash_core::{load_dashboard, DashboardRequest};

    use crate::app::tests::test_app;
    use crate::worker::WorkerResponse;

    fn render_to_string(app: &AppState) -> String {
        let backend = TestBackend::new(140, 45);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn loaded(symbol: &str) -> WorkerResponse {
        let request = DashboardRequest::new(Ticker::parse(symbol).unwrap(), TimeRange::OneYear);
        WorkerResponse::Loaded(load_dashboard(&StaticProvider::demo(), &request))
    }

    #[test]
    fn ready_dashboard_renders_all_panels() {
        let (mut app, _rx, _tx) = test_app();
        app.handle_response(loaded("AAPL"));
        let screen = render_to_string(&app);
        assert!(screen.contains("Apple Inc. (AAPL)"));
        assert!(screen.contains("AAPL Stock Price"));
        assert!(screen.contains("Historical Data"));
        assert!(screen.contains("Key Metrics"));
        assert!(screen.contains("Market Cap"));
        assert!(screen.contains("Company Information"));
    }

    #[test]
    fn empty_result_renders_warning_only() {
        let (mut app, _rx, _tx) = test_app();
        app.handle_response(loaded("ZZZZINVALID"));
        let screen = render_to_string(&app);
        assert!(screen.contains("No data found for symbol: ZZZZINVALID"));
        assert!(!screen.contains("Key Metrics"));
        assert!(!screen.contains("Stock Price"));
    }

    #[test]
    fn overlays_render_over_idle_view() {
        let (mut app, _rx, _tx) = test_app();
        app.overlay = Overlay::Help;
        assert!(render_to_string(&app).contains("Keyboard Shortcuts"));
        app.overlay = Overlay::Welcome;
        assert!(render_to_string(&app).contains("Welcome to TickerDash"));
    }
}
