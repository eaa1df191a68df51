//! Company information: business summary text.

use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(dash) = app.dashboard() else {
        return;
    };
    let para = Paragraph::new(Span::styled(dash.business_summary.as_str(), theme::text()))
        .block(panel_block("Company Information", false))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}
