use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use super::panel;
use crate::app::App;
use crate::theme::Theme;

const NORMAL_TITLE: &str = " o open | d/a extract | ? ask | / search | 1-8 export | q quit ";

pub fn render(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let Some(prompt) = app.prompt() else {
        frame.render_widget(panel(NORMAL_TITLE, false, theme), area);
        return;
    };

    let title = prompt.title();
    let block = panel(&title, true, theme).title_bottom(" Enter submit | Esc cancel ");
    let paragraph = Paragraph::new(app.input())
        .block(block)
        .style(theme.input_cursor)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);

    let prefix: String = app.input().chars().take(app.cursor_position()).collect();
    #[allow(clippy::cast_possible_truncation)]
    let cursor_x = area.x + prefix.width() as u16 + 1;
    frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use invex_core::AppState;

    use crate::app::App;
    use crate::event::AppEvent;
    use crate::test_utils::{render_to_string, test_terminal};
    use crate::theme::Theme;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn normal_mode_shows_key_hints() {
        let app = App::new(AppState::default());
        let output = render_to_string(80, 3, |frame, area| {
            super::render(&app, &Theme::default(), frame, area);
        });
        assert!(output.contains("o open"));
        assert!(output.contains("q quit"));
    }

    #[test]
    fn prompt_title_and_text() {
        let mut app = App::new(AppState::default());
        press(&mut app, KeyCode::Char('?'));
        for c in "total?".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let output = render_to_string(60, 3, |frame, area| {
            super::render(&app, &Theme::default(), frame, area);
        });
        assert!(output.contains("Ask the assistant"));
        assert!(output.contains("total?"));
    }

    #[test]
    fn cursor_follows_input() {
        let mut app = App::new(AppState::default());
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('b'));
        let mut terminal = test_terminal(40, 3);
        terminal
            .draw(|frame| {
                let area = frame.area();
                super::render(&app, &Theme::default(), frame, area);
            })
            .unwrap();
        terminal.backend_mut().assert_cursor_position((3, 1));
    }
}
