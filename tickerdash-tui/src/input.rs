//! Keyboard input dispatch: overlays first, then global keys, then the focused widget.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Focus, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Focus cycling works everywhere.
    match key.code {
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::Enter => {
            app.submit();
            return;
        }
        _ => {}
    }

    // 3. While typing, characters belong to the ticker field.
    if app.focus == Focus::Ticker {
        handle_ticker_key(app, key);
        return;
    }

    // 4. Global keys outside the text field.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('x') => {
            app.export_historical();
            return;
        }
        KeyCode::Char('m') => {
            app.export_metrics();
            return;
        }
        KeyCode::Char('/') | KeyCode::Char('i') => {
            app.focus = Focus::Ticker;
            return;
        }
        _ => {}
    }

    // 5. Focus-specific keys.
    match app.focus {
        Focus::Range => handle_range_key(app, key),
        Focus::History | Focus::Metrics => handle_table_key(app, key),
        Focus::Ticker => {}
    }
}

fn handle_ticker_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ticker_input.push(c.to_ascii_uppercase());
        }
        KeyCode::Backspace => {
            app.ticker_input.pop();
        }
        KeyCode::Esc => {
            app.focus = Focus::Range;
        }
        _ => {}
    }
}

fn handle_range_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('l') | KeyCode::Right => app.set_range(app.range.next()),
        KeyCode::Char('h') | KeyCode::Left => app.set_range(app.range.prev()),
        _ => {}
    }
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::PageDown => {
            for _ in 0..10 {
                app.scroll_down();
            }
        }
        KeyCode::PageUp => {
            for _ in 0..10 {
                app.scroll_up();
            }
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::worker::WorkerCommand;
    use tickerdash_core::domain::TimeRange;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_edits_ticker_and_q_does_not_quit() {
        let (mut app, _rx, _tx) = test_app();
        app.ticker_input.clear();
        type_str(&mut app, "qqq");
        assert!(app.running);
        assert_eq!(app.ticker_input, "QQQ");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.ticker_input, "QQ");
    }

    #[test]
    fn enter_submits() {
        let (mut app, rx, _tx) = test_app();
        app.ticker_input.clear();
        type_str(&mut app, "msft");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(rx.try_recv().unwrap(), WorkerCommand::Load(r) if r.ticker.as_str() == "MSFT"));
    }

    #[test]
    fn tab_cycles_focus() {
        let (mut app, _rx, _tx) = test_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Range);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::History);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Range);
    }

    #[test]
    fn range_keys_reload_immediately() {
        let (mut app, rx, _tx) = test_app();
        app.focus = Focus::Range;
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.range, TimeRange::ThreeMonths);
        assert_eq!(rx.try_iter().count(), 3);
    }

    #[test]
    fn q_quits_outside_text_field() {
        let (mut app, _rx, _tx) = test_app();
        app.focus = Focus::Metrics;
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let (mut app, _rx, _tx) = test_app();
        app.overlay = Overlay::Help;
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn overlays_open_and_close() {
        let (mut app, _rx, _tx) = test_app();
        app.overlay = Overlay::Welcome;
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.ticker_input, "AAPL");

        app.focus = Focus::History;
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.overlay, Overlay::Help);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.overlay, Overlay::None);
    }
}
