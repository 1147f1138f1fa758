use ratatui::layout::{Constraint, Layout, Rect};

/// Below this width the panes stack in a single column.
const WIDE_MIN_WIDTH: u16 = 100;

pub struct AppLayout {
    pub header: Rect,
    pub preview: Rect,
    pub fields: Rect,
    pub tables: Rect,
    pub chat: Rect,
    pub insights: Rect,
    pub progress: Rect,
    pub input: Rect,
    pub status: Rect,
}

impl AppLayout {
    #[must_use]
    pub fn compute(area: Rect) -> Self {
        let outer = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

        let body = outer[1];
        if area.width < WIDE_MIN_WIDTH {
            let column = Layout::vertical([
                Constraint::Length(3),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Fill(1),
            ])
            .split(body);
            return Self {
                header: outer[0],
                preview: column[0],
                fields: column[1],
                tables: column[2],
                chat: column[3],
                insights: column[4],
                progress: outer[2],
                input: outer[3],
                status: outer[4],
            };
        }

        let columns = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(body);
        let left = Layout::vertical([
            Constraint::Length(5),
            Constraint::Fill(3),
            Constraint::Fill(2),
        ])
        .split(columns[0]);
        let right = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        Self {
            header: outer[0],
            preview: left[0],
            fields: left[1],
            insights: left[2],
            tables: right[0],
            chat: right[1],
            progress: outer[2],
            input: outer[3],
            status: outer[4],
        }
    }
}
