//! Company name, last price and change versus previous close.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(dash) = app.dashboard() else {
        return;
    };
    let quote = &dash.quote;

    let mut spans = vec![Span::styled(quote.heading(&dash.ticker), theme::accent_bold())];
    if let Some(price) = quote.price_display() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(price, theme::text()));
    }
    if let Some(change) = &quote.change {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(change.display(), theme::change_style(change.is_gain())));
    }

    let block = panel_block(dash.range.label(), false);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
