use std::path::PathBuf;

use invex_client::{FieldMap, RenderedImage};

use crate::document::Document;
use crate::preferences::{Preferences, Theme};
use crate::sequence::SequenceGuard;
use crate::tables::TableSet;
use crate::transcript::Transcript;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Processing,
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Preview {
    #[default]
    Placeholder,
    /// A local image shown while its upload is in flight.
    LocalFile(PathBuf),
    /// A page image served by the backend.
    Remote(String),
    /// Bytes returned by the bounding-box endpoint.
    Rendered(RenderedImage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Uploading,
    Ready,
    Extracting,
}

/// What the assistant reply area shows.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    /// Fraction in `(0, 1]`; `None` hides the badge.
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FraudVerdict {
    Clean,
    Flagged(Vec<String>),
}

/// Settings the controller needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub timestamped_names: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            timestamped_names: false,
        }
    }
}

/// Everything the front end shows, mutated only by the controller.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub document: Document,
    pub fields: FieldMap,
    /// Trimmed, lowercased search query.
    pub highlight: Option<String>,
    /// `None` until the first table extraction completes.
    pub tables: Option<TableSet>,
    pub transcript: Transcript,
    pub status: Option<Status>,
    pub progress: Option<Progress>,
    pub preview: Preview,
    pub reply: Option<AssistantReply>,
    pub summary: Option<String>,
    pub fraud: Option<FraudVerdict>,
    pub theme: Theme,
    pub preferences: Preferences,
    pub guard: SequenceGuard,
    pub(crate) uploads_in_flight: usize,
    pub(crate) extractions_in_flight: usize,
}

impl AppState {
    /// Fresh state; the theme is the saved choice, else `default_theme`.
    #[must_use]
    pub fn new(settings: Settings, preferences: Preferences, default_theme: Theme) -> Self {
        Self {
            settings,
            document: Document::Empty,
            fields: FieldMap::new(),
            highlight: None,
            tables: None,
            transcript: Transcript::new(),
            status: None,
            progress: None,
            preview: Preview::Placeholder,
            reply: None,
            summary: None,
            fraud: None,
            theme: preferences.theme.unwrap_or(default_theme),
            preferences,
            guard: SequenceGuard::new(),
            uploads_in_flight: 0,
            extractions_in_flight: 0,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        self.preferences.session_id.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.uploads_in_flight > 0 {
            Phase::Uploading
        } else if self.extractions_in_flight > 0 {
            Phase::Extracting
        } else if self.document.is_loaded() {
            Phase::Ready
        } else {
            Phase::Empty
        }
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status = Some(Status {
            message: message.into(),
            kind,
        });
    }

    /// Whether the field card for `label`/`value` matches the active search.
    #[must_use]
    pub fn is_highlighted(&self, label: &str, value: &str) -> bool {
        self.highlight.as_deref().is_some_and(|q| {
            label.to_lowercase().contains(q) || value.to_lowercase().contains(q)
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default(), Preferences::default(), Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_theme_wins_over_default() {
        let prefs = Preferences {
            theme: Some(Theme::Dark),
            session_id: None,
        };
        let state = AppState::new(Settings::default(), prefs, Theme::Light);
        assert_eq!(state.theme, Theme::Dark);

        let state = AppState::new(Settings::default(), Preferences::default(), Theme::Dark);
        assert_eq!(state.theme, Theme::Dark);
    }

    #[test]
    fn phase_follows_counters() {
        let mut state = AppState::default();
        assert_eq!(state.phase(), Phase::Empty);
        state.uploads_in_flight = 1;
        assert_eq!(state.phase(), Phase::Uploading);
        state.uploads_in_flight = 0;
        state.document = Document::Image {
            filename: "a.png".into(),
        };
        assert_eq!(state.phase(), Phase::Ready);
        state.extractions_in_flight = 2;
        assert_eq!(state.phase(), Phase::Extracting);
    }

    #[test]
    fn highlight_is_case_insensitive() {
        let mut state = AppState::default();
        assert!(!state.is_highlighted("Vendor", "ACME"));
        state.highlight = Some("acme".into());
        assert!(state.is_highlighted("Vendor", "ACME Corp"));
        assert!(state.is_highlighted("Acme ID", "7"));
        assert!(!state.is_highlighted("Total", "10"));
    }
}
