use invex_core::view::{PreviewView, View};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::panel;
use crate::theme::Theme;

pub fn render(view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let body = match &view.preview {
        PreviewView::Placeholder => Span::styled("Invoice preview will appear here", theme.muted),
        PreviewView::LocalFile(path) => Span::raw(format!("Local file: {path}")),
        PreviewView::Remote(url) => Span::raw(format!("Page image: {url}")),
        PreviewView::Rendered { content_type, size } => Span::raw(format!(
            "Bounding boxes: {} ({size} bytes)",
            content_type.as_deref().unwrap_or("image")
        )),
    };

    let mut lines = vec![Line::from(body)];
    if let Some(nav) = &view.page_nav {
        let prev = if nav.can_prev { "< [ " } else { "    " };
        let next = if nav.can_next { " ] >" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(prev, theme.muted),
            Span::styled(nav.label.clone(), theme.panel_title),
            Span::styled(next, theme.muted),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel(" Preview ", false, theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
