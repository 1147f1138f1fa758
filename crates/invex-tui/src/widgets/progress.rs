use invex_core::view::View;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Gauge;

use crate::theme::Theme;

pub fn render(view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let Some(progress) = &view.progress else {
        return;
    };
    let percent = progress.percent.min(100);
    let gauge = Gauge::default()
        .gauge_style(theme.progress)
        .percent(u16::from(percent))
        .label(format!("{} {percent}%", progress.label));
    frame.render_widget(gauge, area);
}

#[cfg(test)]
mod tests {
    use invex_core::AppState;
    use invex_core::state::Progress;
    use invex_core::view;

    use crate::test_utils::render_to_string;
    use crate::theme::Theme;

    #[test]
    fn hidden_without_progress() {
        let view = view::render(&AppState::default());
        let output = render_to_string(40, 1, |frame, area| {
            super::render(&view, &Theme::default(), frame, area);
        });
        assert_eq!(output.trim(), "");
    }

    #[test]
    fn shows_label_and_percent() {
        let mut state = AppState::default();
        state.progress = Some(Progress {
            percent: 40,
            label: "Uploading...".into(),
        });
        let view = view::render(&state);
        let output = render_to_string(40, 1, |frame, area| {
            super::render(&view, &Theme::default(), frame, area);
        });
        assert!(output.contains("Uploading... 40%"));
    }
}
