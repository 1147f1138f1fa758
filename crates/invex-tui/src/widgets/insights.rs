use invex_core::view::View;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{panel, wrap};
use crate::theme::Theme;

pub fn render(view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let width = usize::from(area.width.saturating_sub(2));
    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Summary", theme.panel_title))];

    match &view.summary {
        Some(summary) => lines.extend(wrap(summary, width).into_iter().map(Line::from)),
        None => lines.push(Line::from(Span::styled(
            "Press s to summarize the invoice.",
            theme.muted,
        ))),
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Fraud check", theme.panel_title)));
    match &view.fraud {
        Some(fraud) if fraud.flagged => {
            let mut rows = fraud.lines.iter();
            if let Some(heading) = rows.next() {
                lines.push(Line::from(Span::styled(heading.clone(), theme.error)));
            }
            for flag in rows {
                lines.push(Line::from(format!("- {flag}")));
            }
        }
        Some(fraud) => {
            for line in &fraud.lines {
                lines.push(Line::from(Span::styled(line.clone(), theme.success)));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Press f to check for fraud or anomalies.",
            theme.muted,
        ))),
    }

    frame.render_widget(Paragraph::new(lines).block(panel(" Insights ", false, theme)), area);
}

#[cfg(test)]
mod tests {
    use invex_core::AppState;
    use invex_core::state::FraudVerdict;
    use invex_core::view::{self, FRAUD_HEADING, NO_FRAUD};

    use crate::test_utils::render_to_string;
    use crate::theme::Theme;

    fn draw(state: &AppState) -> String {
        let view = view::render(state);
        render_to_string(60, 12, |frame, area| {
            super::render(&view, &Theme::default(), frame, area);
        })
    }

    #[test]
    fn hints_before_any_request() {
        let output = draw(&AppState::default());
        assert!(output.contains("Press s to summarize"));
        assert!(output.contains("Press f to check"));
    }

    #[test]
    fn empty_summary_reads_no_summary() {
        let mut state = AppState::default();
        state.summary = Some(String::new());
        assert!(draw(&state).contains("No summary available."));
    }

    #[test]
    fn flagged_invoice_lists_flags() {
        let mut state = AppState::default();
        state.summary = Some("Office supplies from Acme.".into());
        state.fraud = Some(FraudVerdict::Flagged(vec![
            "Duplicate invoice number".into(),
            "Total exceeds line items".into(),
        ]));
        let output = draw(&state);
        assert!(output.contains("Office supplies from Acme."));
        assert!(output.contains(FRAUD_HEADING));
        assert!(output.contains("- Duplicate invoice number"));
        assert!(output.contains("- Total exceeds line items"));
    }

    #[test]
    fn clean_invoice_says_so() {
        let mut state = AppState::default();
        state.fraud = Some(FraudVerdict::Clean);
        assert!(draw(&state).contains(NO_FRAUD));
    }
}
