use invex_core::controller::MSG_THINKING;
use invex_core::view::View;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::{panel, wrap};
use crate::app::{App, Focus};
use crate::theme::Theme;

const REPLY_HEIGHT: u16 = 4;

pub fn render(app: &App, view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let (transcript_area, reply_area) = if area.height >= REPLY_HEIGHT * 2 {
        let split = Layout::vertical([Constraint::Fill(1), Constraint::Length(REPLY_HEIGHT)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    render_transcript(app, view, theme, frame, transcript_area);
    if let Some(reply_area) = reply_area {
        render_reply(view, theme, frame, reply_area);
    }
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, prefix: &str, text: &str, style: Style, width: usize) {
    let body_width = width.saturating_sub(prefix.len());
    for (i, part) in wrap(text, body_width).into_iter().enumerate() {
        let lead = if i == 0 {
            prefix.to_owned()
        } else {
            " ".repeat(prefix.len())
        };
        lines.push(Line::from(Span::styled(format!("{lead}{part}"), style)));
    }
}

fn render_transcript(app: &App, view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let block = panel(" Assistant ", app.focus() == Focus::Chat, theme);

    if view.chat.is_empty() {
        let hint = Span::styled("Press ? to ask a question about the invoice.", theme.muted);
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    let width = usize::from(area.width.saturating_sub(2));
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, bubble) in view.chat.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        push_wrapped(&mut lines, "You: ", &bubble.question, theme.user_message, width);
        if bubble.answer.is_empty() {
            push_wrapped(&mut lines, "AI:  ", MSG_THINKING, theme.muted, width);
        } else {
            push_wrapped(&mut lines, "AI:  ", &bubble.answer, theme.assistant_message, width);
        }
    }

    // `chat_scroll` counts lines up from the bottom.
    let inner_height = usize::from(area.height.saturating_sub(2));
    let max_offset = lines.len().saturating_sub(inner_height);
    let offset = max_offset.saturating_sub(app.chat_scroll());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

fn render_reply(view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let mut block = panel(" Reply ", false, theme);
    if let Some(badge) = &view.badge {
        block = block.title_bottom(Span::styled(format!(" {badge} "), theme.badge));
    }
    let text = match &view.reply {
        Some(reply) => Span::styled(reply.clone(), theme.assistant_message),
        None => Span::styled("-", theme.muted),
    };
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use invex_core::AppState;
    use invex_core::state::AssistantReply;
    use invex_core::view;

    use crate::app::App;
    use crate::test_utils::render_to_string;
    use crate::theme::Theme;

    fn draw(app: &App, width: u16, height: u16) -> String {
        let view = view::render(app.state());
        render_to_string(width, height, |frame, area| {
            super::render(app, &view, &Theme::default(), frame, area);
        })
    }

    #[test]
    fn empty_transcript_shows_hint() {
        let output = draw(&App::new(AppState::default()), 60, 10);
        assert!(output.contains("Press ? to ask"));
    }

    #[test]
    fn shows_turns_and_pending_answer() {
        let mut state = AppState::default();
        let first = state.transcript.push_pending("Who is the vendor?");
        state.transcript.answer(first, "Acme Corp");
        state.transcript.push_pending("What is the total?");

        let output = draw(&App::new(state), 60, 14);
        assert!(output.contains("You: Who is the vendor?"));
        assert!(output.contains("AI:  Acme Corp"));
        assert!(output.contains("You: What is the total?"));
        assert!(output.contains("AI:  Thinking..."));
    }

    #[test]
    fn reply_box_carries_confidence_badge() {
        let mut state = AppState::default();
        state.reply = Some(AssistantReply {
            text: "Acme Corp".into(),
            confidence: Some(0.875),
        });
        let output = draw(&App::new(state), 60, 12);
        assert!(output.contains("Reply"));
        assert!(output.contains("87.5% Confidence"));
    }

    #[test]
    fn newest_lines_visible_when_overflowing() {
        let mut state = AppState::default();
        for i in 0..10 {
            let turn = state.transcript.push_pending(format!("question {i}"));
            state.transcript.answer(turn, format!("answer {i}"));
        }
        // Too short for the reply box: transcript gets all 6 rows, 4 inside borders.
        let output = draw(&App::new(state), 40, 6);
        assert!(output.contains("answer 9"));
        assert!(!output.contains("question 0"));
    }
}
