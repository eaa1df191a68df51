//! Modal overlays: welcome, keyboard help, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

fn popup_block(title: String, style: ratatui::style::Style) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
        .title_style(style.add_modifier(Modifier::BOLD))
}

/// Shown until the first key press on a fresh install.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled(
            "  1. Type a ticker symbol (e.g. AAPL, MSFT, ^GSPC)",
            theme::muted(),
        )),
        Line::from(Span::styled("  2. Press Enter to load the dashboard", theme::muted())),
        Line::from(Span::styled(
            "  3. Tab to Time Range and use h/l to change it",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  4. Press x or m to export the tables as CSV",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press ? at any time for all shortcuts.", theme::neutral())),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text)
        .block(popup_block(" Welcome to TickerDash ".into(), theme::accent()))
        .wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Anywhere");
    key(&mut lines, "Tab / Shift+Tab", "Cycle focus forward / back");
    key(&mut lines, "Enter", "Load the ticker in the input field");
    key(&mut lines, "Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Ticker field");
    key(&mut lines, "letters", "Edit symbol (upper-cased)");
    key(&mut lines, "Backspace", "Delete last character");
    key(&mut lines, "Esc", "Leave the field (focus Time Range)");
    lines.push(Line::from(""));

    section(&mut lines, "Outside the ticker field");
    key(&mut lines, "/ or i", "Focus the ticker field");
    key(&mut lines, "h / l", "Previous / next time range (reloads)");
    key(&mut lines, "j / k", "Scroll the focused table");
    key(&mut lines, "PgUp / PgDn", "Scroll by ten rows");
    key(&mut lines, "x", "Export historical data CSV");
    key(&mut lines, "m", "Export key metrics CSV");
    key(&mut lines, "e", "Open error history");
    key(&mut lines, "?", "Toggle this help");
    key(&mut lines, "q", "Quit");

    let para = Paragraph::new(lines).block(popup_block(
        " Keyboard Shortcuts [Esc]close ".into(),
        theme::accent(),
    ));
    f.render_widget(para, popup);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}

/// Fetch and export failures, newest first.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = popup_block(
        format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ),
        theme::negative(),
    );
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No errors recorded.", theme::muted())),
            inner,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), theme::muted()),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));
        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
