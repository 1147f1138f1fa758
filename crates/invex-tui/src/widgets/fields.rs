use invex_core::view::View;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use super::panel;
use crate::app::{App, Focus};
use crate::theme::Theme;

pub fn render(app: &App, view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let focused = app.focus() == Focus::Fields;
    let block = panel(" Invoice Fields ", focused, theme);

    if view.fields.is_empty() {
        let hint = Paragraph::new(Span::styled(
            "No fields yet. Press d (dataset) or a (AI) to extract.",
            theme.muted,
        ))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = view
        .fields
        .iter()
        .map(|card| {
            let line = Line::from(vec![
                Span::styled(format!("{}: ", card.label), theme.panel_title),
                Span::raw(card.value.clone()),
            ]);
            let item = ListItem::new(line);
            if card.highlighted {
                item.style(theme.highlight)
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(theme.selected);
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected_field()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use invex_core::AppState;
    use invex_core::view;
    use ratatui::style::Modifier;

    use crate::app::App;
    use crate::test_utils::{render_to_string, test_terminal};
    use crate::theme::Theme;

    fn app_with_fields(pairs: &[(&str, &str)]) -> App {
        let mut state = AppState::default();
        state.fields = pairs.iter().copied().collect();
        App::new(state)
    }

    #[test]
    fn empty_grid_shows_hint() {
        let app = App::new(AppState::default());
        let view = view::render(app.state());
        let output = render_to_string(70, 5, |frame, area| {
            super::render(&app, &view, &Theme::default(), frame, area);
        });
        assert!(output.contains("Invoice Fields"));
        assert!(output.contains("No fields yet."));
    }

    #[test]
    fn lists_fields_in_order() {
        let app = app_with_fields(&[("Total", "12.50"), ("Vendor", "Acme")]);
        let view = view::render(app.state());
        let output = render_to_string(40, 5, |frame, area| {
            super::render(&app, &view, &Theme::default(), frame, area);
        });
        let total = output.find("Total: 12.50").unwrap();
        let vendor = output.find("Vendor: Acme").unwrap();
        assert!(total < vendor);
    }

    #[test]
    fn selected_row_is_reversed_when_focused() {
        let app = app_with_fields(&[("Total", "12.50"), ("Vendor", "Acme")]);
        let view = view::render(app.state());
        let mut terminal = test_terminal(40, 5);
        terminal
            .draw(|frame| {
                let area = frame.area();
                super::render(&app, &view, &Theme::default(), frame, area);
            })
            .unwrap();
        let buf = terminal.backend().buffer();
        assert!(buf[(1, 1)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(1, 2)].modifier.contains(Modifier::REVERSED));
    }
}
