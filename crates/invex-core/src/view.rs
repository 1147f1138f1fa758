//! Pure projection of [`AppState`] into what the front end draws.

use invex_client::Table;

use crate::controller::MSG_NO_SUMMARY;
use crate::preferences::Theme;
use crate::state::{AppState, FraudVerdict, Phase, Preview, StatusKind};

pub const NO_TABLES: &str = "No tables found.";
pub const FRAUD_HEADING: &str = "Fraud/Anomaly Detected:";
pub const NO_FRAUD: &str = "No fraud or anomaly detected.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewView {
    Placeholder,
    LocalFile(String),
    Remote(String),
    Rendered {
        content_type: Option<String>,
        size: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNav {
    pub label: String,
    pub can_prev: bool,
    pub can_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCard {
    pub label: String,
    pub value: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TablesView {
    NotExtracted,
    Empty,
    Tables(Vec<Table>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FraudView {
    pub flagged: bool,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub theme: Theme,
    /// Label of the theme switch: names the theme it switches to.
    pub theme_toggle: &'static str,
    pub phase: Phase,
    pub status: Option<StatusLine>,
    pub progress: Option<ProgressView>,
    pub preview: PreviewView,
    pub page_nav: Option<PageNav>,
    pub filename: Option<String>,
    pub fields: Vec<FieldCard>,
    pub tables: TablesView,
    pub chat: Vec<ChatBubble>,
    pub reply: Option<String>,
    pub badge: Option<String>,
    pub summary: Option<String>,
    pub fraud: Option<FraudView>,
}

/// `"87.3% Confidence"` for a fraction of `0.873`.
#[must_use]
pub fn confidence_badge(confidence: f64) -> String {
    format!("{:.1}% Confidence", confidence * 100.0)
}

#[must_use]
pub fn render(state: &AppState) -> View {
    let page_nav = state.document.pages().map(|pages| PageNav {
        label: pages.label(),
        can_prev: pages.can_prev(),
        can_next: pages.can_next(),
    });

    let fields = state
        .fields
        .iter()
        .map(|(label, value)| FieldCard {
            label: label.to_owned(),
            value: value.to_owned(),
            highlighted: state.is_highlighted(label, value),
        })
        .collect();

    let tables = match &state.tables {
        None => TablesView::NotExtracted,
        Some(set) if set.is_empty() => TablesView::Empty,
        Some(set) => TablesView::Tables(set.tables().to_vec()),
    };

    let preview = match &state.preview {
        Preview::Placeholder => PreviewView::Placeholder,
        Preview::LocalFile(path) => PreviewView::LocalFile(path.display().to_string()),
        Preview::Remote(url) => PreviewView::Remote(url.clone()),
        Preview::Rendered(image) => PreviewView::Rendered {
            content_type: image.content_type.clone(),
            size: image.bytes.len(),
        },
    };

    let fraud = state.fraud.as_ref().map(|verdict| match verdict {
        FraudVerdict::Flagged(flags) => FraudView {
            flagged: true,
            lines: std::iter::once(FRAUD_HEADING.to_owned())
                .chain(flags.iter().cloned())
                .collect(),
        },
        FraudVerdict::Clean => FraudView {
            flagged: false,
            lines: vec![NO_FRAUD.to_owned()],
        },
    });

    View {
        theme: state.theme,
        theme_toggle: match state.theme {
            Theme::Light => "Dark Mode",
            Theme::Dark => "Light Mode",
        },
        phase: state.phase(),
        status: state.status.as_ref().map(|s| StatusLine {
            text: s.message.clone(),
            kind: s.kind,
        }),
        progress: state.progress.as_ref().map(|p| ProgressView {
            percent: p.percent,
            label: p.label.clone(),
        }),
        preview,
        page_nav,
        filename: state.document.filename().map(str::to_owned),
        fields,
        tables,
        chat: state
            .transcript
            .turns()
            .iter()
            .map(|t| ChatBubble {
                question: t.question.clone(),
                answer: t.answer.clone(),
            })
            .collect(),
        reply: state.reply.as_ref().map(|r| r.text.clone()),
        badge: state
            .reply
            .as_ref()
            .and_then(|r| r.confidence)
            .map(confidence_badge),
        summary: state.summary.clone().map(|s| {
            if s.is_empty() {
                MSG_NO_SUMMARY.to_owned()
            } else {
                s
            }
        }),
        fraud,
    }
}
