pub mod chat;
pub mod fields;
pub mod header;
pub mod input;
pub mod insights;
pub mod preview;
pub mod progress;
pub mod status;
pub mod tables;

use ratatui::widgets::{Block, Borders};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::Theme;

fn panel<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            theme.panel_focused
        } else {
            theme.panel_border
        })
        .title(title)
        .title_style(theme.panel_title)
}

/// Greedy word wrap to `width` display columns. Words wider than a line are split.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let sep = usize::from(!line.is_empty());
            if line.width() + sep + word.width() <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for c in word.chars() {
                if line.width() + c.width().unwrap_or(0) > width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(c);
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::wrap;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("total due in thirty days", 10), ["total due", "in thirty", "days"]);
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap("INV-0000123456", 5), ["INV-0", "00012", "3456"]);
    }

    #[test]
    fn wrap_splits_long_word_after_short_one() {
        assert_eq!(wrap("ref INV-00012", 6), ["ref", "INV-00", "012"]);
    }

    #[test]
    fn wrap_keeps_explicit_newlines_and_blank_lines() {
        assert_eq!(wrap("a\n\nb", 10), ["a", "", "b"]);
    }

    #[test]
    fn wrap_empty_text_is_one_blank_line() {
        assert_eq!(wrap("", 10), [""]);
    }
}
