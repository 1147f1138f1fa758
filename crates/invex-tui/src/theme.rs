use invex_core::preferences::Theme as Mode;
use invex_core::state::StatusKind;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub base: Style,
    pub header: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_focused: Style,
    pub panel_title: Style,
    pub highlight: Style,
    pub selected: Style,
    pub table_header: Style,
    pub user_message: Style,
    pub assistant_message: Style,
    pub muted: Style,
    pub badge: Style,
    pub processing: Style,
    pub success: Style,
    pub error: Style,
    pub info: Style,
    pub progress: Style,
    pub input_cursor: Style,
}

impl Theme {
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Light => Self::light(),
            Mode::Dark => Self::dark(),
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            base: Style::default().fg(Color::Black).bg(Color::White),
            header: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(37, 99, 235))
                .add_modifier(Modifier::BOLD),
            status_bar: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(226, 232, 240)),
            panel_border: Style::default().fg(Color::Rgb(148, 163, 184)),
            panel_focused: Style::default().fg(Color::Rgb(37, 99, 235)),
            panel_title: Style::default()
                .fg(Color::Rgb(30, 41, 59))
                .add_modifier(Modifier::BOLD),
            highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(253, 230, 138)),
            selected: Style::default().add_modifier(Modifier::REVERSED),
            table_header: Style::default()
                .fg(Color::Rgb(30, 64, 175))
                .add_modifier(Modifier::BOLD),
            user_message: Style::default().fg(Color::Rgb(29, 78, 216)),
            assistant_message: Style::default().fg(Color::Rgb(30, 41, 59)),
            muted: Style::default().fg(Color::Rgb(100, 116, 139)),
            badge: Style::default()
                .fg(Color::Rgb(21, 128, 61))
                .add_modifier(Modifier::BOLD),
            processing: Style::default().fg(Color::Rgb(180, 83, 9)),
            success: Style::default().fg(Color::Rgb(21, 128, 61)),
            error: Style::default().fg(Color::Rgb(185, 28, 28)),
            info: Style::default().fg(Color::Rgb(29, 78, 216)),
            progress: Style::default().fg(Color::Rgb(37, 99, 235)),
            input_cursor: Style::default()
                .fg(Color::Rgb(37, 99, 235))
                .add_modifier(Modifier::BOLD),
        }
    }

    #[must_use]
    pub fn dark() -> Self {
        Self {
            base: Style::default().fg(Color::White).bg(Color::Rgb(15, 23, 42)),
            header: Style::default()
                .fg(Color::Rgb(200, 220, 255))
                .bg(Color::Rgb(20, 40, 80))
                .add_modifier(Modifier::BOLD),
            status_bar: Style::default().fg(Color::White).bg(Color::DarkGray),
            panel_border: Style::default().fg(Color::Gray),
            panel_focused: Style::default().fg(Color::Rgb(215, 150, 60)),
            panel_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(215, 150, 60)),
            selected: Style::default().add_modifier(Modifier::REVERSED),
            table_header: Style::default()
                .fg(Color::Rgb(100, 180, 255))
                .add_modifier(Modifier::BOLD),
            user_message: Style::default().fg(Color::Cyan),
            assistant_message: Style::default().fg(Color::White),
            muted: Style::default().fg(Color::DarkGray),
            badge: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            processing: Style::default().fg(Color::Yellow),
            success: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red),
            info: Style::default().fg(Color::Cyan),
            progress: Style::default().fg(Color::Rgb(100, 180, 255)),
            input_cursor: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    #[must_use]
    pub fn status(&self, kind: StatusKind) -> Style {
        match kind {
            StatusKind::Processing => self.processing,
            StatusKind::Success => self.success,
            StatusKind::Error => self.error,
            StatusKind::Info => self.info,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selects_palette() {
        assert_eq!(Theme::for_mode(Mode::Dark).base, Theme::dark().base);
        assert_eq!(Theme::for_mode(Mode::Light).base, Theme::light().base);
        assert_ne!(Theme::light().base, Theme::dark().base);
    }

    #[test]
    fn status_kinds_are_distinct() {
        let theme = Theme::default();
        let styles = [
            theme.status(StatusKind::Processing),
            theme.status(StatusKind::Success),
            theme.status(StatusKind::Error),
            theme.status(StatusKind::Info),
        ];
        for (i, a) in styles.iter().enumerate() {
            for b in &styles[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn error_is_red_in_dark_mode() {
        assert_eq!(Theme::dark().error.fg, Some(Color::Red));
    }
}
