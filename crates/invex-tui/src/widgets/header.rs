use invex_core::view::View;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::theme::Theme;

pub fn render(view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let document = view.filename.as_deref().unwrap_or("No invoice loaded");
    let text = format!(
        " invex v{} | {document} | [m] {}",
        env!("CARGO_PKG_VERSION"),
        view.theme_toggle
    );
    let paragraph = Paragraph::new(Line::from(Span::styled(text, theme.header))).style(theme.header);
    frame.render_widget(paragraph, area);
}
