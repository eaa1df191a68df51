//! Bottom status bar: key hints for the focused widget, then the last
//! status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Focus, StatusLevel};
use crate::theme;

fn hints(focus: Focus) -> &'static str {
    match focus {
        Focus::Ticker => " type symbol  Enter:load  Tab:next  Esc:leave field",
        Focus::Range => " h/l:range  Tab:next  x/m:export  ?:help  q:quit",
        Focus::History | Focus::Metrics => " j/k:scroll  Tab:next  x/m:export  ?:help  q:quit",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(hints(app.focus), theme::muted())];

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
