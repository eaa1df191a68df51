//! Colour tokens and style helpers for the dashboard.
//!
//! Dark background, cyan accent for focus, green/red for gains and losses,
//! orange for warnings. Chart lines keep the colours the core chart model
//! assigns.

use ratatui::style::{Color, Modifier, Style};

use tickerdash_core::chart::LineColor;

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 200, 83);
pub const NEGATIVE: Color = Color::Rgb(255, 64, 64);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        muted()
    }
}

/// Green for a gain (including no change), red for a loss.
pub fn change_style(is_gain: bool) -> Style {
    if is_gain {
        positive()
    } else {
        negative()
    }
}

pub fn line_color(color: LineColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}
