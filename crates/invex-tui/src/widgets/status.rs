use invex_core::state::Phase;
use invex_core::view::View;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Focus, InputMode};
use crate::theme::Theme;

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Empty => "No invoice",
        Phase::Uploading => "Uploading",
        Phase::Ready => "Ready",
        Phase::Extracting => "Extracting",
    }
}

pub fn render(app: &App, view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let mode = match app.input_mode() {
        InputMode::Normal => "Normal",
        InputMode::Insert => "Insert",
    };
    let focus = match app.focus() {
        Focus::Fields => "Fields",
        Focus::Tables => "Tables",
        Focus::Chat => "Chat",
    };

    let mut spans = vec![Span::styled(
        format!(" [{mode}] | {} | Focus: {focus} | ", phase_label(view.phase)),
        theme.status_bar,
    )];
    if let Some(status) = &view.status {
        spans.push(Span::styled(
            status.text.clone(),
            theme.status_bar.patch(theme.status(status.kind)),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme.status_bar);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use invex_core::AppState;
    use invex_core::state::{Status, StatusKind};
    use invex_core::view;

    use crate::app::App;
    use crate::event::AppEvent;
    use crate::test_utils::render_to_string;
    use crate::theme::Theme;

    fn draw(app: &App) -> String {
        let view = view::render(app.state());
        render_to_string(100, 1, |frame, area| {
            super::render(app, &view, &Theme::default(), frame, area);
        })
    }

    #[test]
    fn idle_status_line() {
        let output = draw(&App::new(AppState::default()));
        assert!(output.contains("[Normal] | No invoice | Focus: Fields"));
    }

    #[test]
    fn shows_status_message() {
        let mut state = AppState::default();
        state.status = Some(Status {
            message: "Extraction complete!".into(),
            kind: StatusKind::Success,
        });
        assert!(draw(&App::new(state)).contains("Extraction complete!"));
    }

    #[test]
    fn reflects_insert_mode_and_focus() {
        let mut app = App::new(AppState::default());
        app.handle_event(AppEvent::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)));
        app.handle_event(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('/'),
            KeyModifiers::NONE,
        )));
        let output = draw(&app);
        assert!(output.contains("[Insert]"));
        assert!(output.contains("Focus: Tables"));
    }
}
