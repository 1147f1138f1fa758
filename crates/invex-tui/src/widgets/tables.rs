use invex_client::Table;
use invex_core::view::{NO_TABLES, TablesView, View};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use super::panel;
use crate::app::{App, Focus};
use crate::theme::Theme;

const COLUMN_SEP: &str = " | ";

pub fn render(app: &App, view: &View, theme: &Theme, frame: &mut Frame, area: Rect) {
    let focused = app.focus() == Focus::Tables;
    let block = panel(" Tables ", focused, theme);

    let tables = match &view.tables {
        TablesView::NotExtracted => {
            let hint = Span::styled(
                "Press t (current page) or T (all pages) to extract tables.",
                theme.muted,
            );
            frame.render_widget(Paragraph::new(hint).block(block), area);
            return;
        }
        TablesView::Empty => {
            frame.render_widget(Paragraph::new(NO_TABLES).block(block), area);
            return;
        }
        TablesView::Tables(tables) => tables,
    };

    let selected = if focused { app.selected_cell() } else { None };
    let (lines, selected_line) = table_lines(tables, selected, theme);

    // Keep the selected row on screen.
    let inner_height = usize::from(area.height.saturating_sub(2));
    let offset = selected_line
        .map_or(0, |line| (line + 1).saturating_sub(inner_height));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

fn column_widths(table: &Table) -> Vec<usize> {
    let columns = table.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|c| {
            table
                .iter()
                .filter_map(|row| row.get(c))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
        })
        .collect()
}

/// Lines for every table, plus the index of the line holding the selected cell.
fn table_lines(
    tables: &[Table],
    selected: Option<(usize, usize, usize)>,
    theme: &Theme,
) -> (Vec<Line<'static>>, Option<usize>) {
    let mut lines = Vec::new();
    let mut selected_line = None;

    for (t, table) in tables.iter().enumerate() {
        if t > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            format!("Table {}", t + 1),
            theme.panel_title,
        )));
        let widths = column_widths(table);

        for (r, row) in table.iter().enumerate() {
            let base = if r == 0 {
                theme.table_header
            } else {
                ratatui::style::Style::default()
            };
            let mut spans = Vec::with_capacity(row.len() * 2);
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    spans.push(Span::styled(COLUMN_SEP, theme.muted));
                }
                let pad = widths[c].saturating_sub(cell.width());
                let text = format!("{cell}{}", " ".repeat(pad));
                let style = if selected == Some((t, r, c)) {
                    selected_line = Some(lines.len());
                    base.patch(theme.selected)
                } else {
                    base
                };
                spans.push(Span::styled(text, style));
            }
            lines.push(Line::from(spans));
        }
    }
    (lines, selected_line)
}
