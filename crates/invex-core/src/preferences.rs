//! Locally persisted profile: theme choice and chat session id.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}`, expected `light` or `dark`")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("failed to access preferences file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Explicit user choice; `None` defers to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Preferences {
    /// Return the stored session id, creating one on first use.
    ///
    /// The boolean is `true` when a new id was generated and needs saving.
    pub fn ensure_session_id(&mut self) -> (&str, bool) {
        let created = self.session_id.as_deref().is_none_or(str::is_empty);
        if created {
            self.session_id = Some(uuid::Uuid::new_v4().to_string());
        }
        (self.session_id.as_deref().unwrap_or_default(), created)
    }
}

/// TOML-backed store for [`Preferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preferences; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Preferences, PreferencesError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(source) => Err(PreferencesError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Write `prefs`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let content = toml::to_string(prefs)?;
        let io_err = |source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, content).map_err(io_err)
    }

    /// Load preferences and make sure a session id exists, persisting a new one.
    ///
    /// An unreadable file is replaced by fresh defaults; a failed write is logged and
    /// the in-memory id is still returned.
    #[must_use]
    pub fn load_or_init(&self) -> Preferences {
        let mut prefs = self.load().unwrap_or_else(|e| {
            tracing::warn!("resetting preferences: {e:#}");
            Preferences::default()
        });
        let (session_id, created) = prefs.ensure_session_id();
        if created {
            tracing::info!(session_id, "created chat session id");
            if let Err(e) = self.save(&prefs) {
                tracing::warn!("failed to persist preferences: {e:#}");
            }
        }
        prefs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("prefs.toml"));
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("nested/prefs.toml"));
        let prefs = Preferences {
            theme: Some(Theme::Dark),
            session_id: Some("abc".into()),
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);
    }

    #[test]
    fn session_id_is_created_once() {
        let mut prefs = Preferences::default();
        let (first, created) = prefs.ensure_session_id();
        let first = first.to_owned();
        assert!(created);
        assert!(uuid::Uuid::parse_str(&first).is_ok());

        let (second, created) = prefs.ensure_session_id();
        assert!(!created);
        assert_eq!(second, first);
    }

    #[test]
    fn load_or_init_persists_session_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("prefs.toml"));

        let first = store.load_or_init();
        let second = store.load_or_init();
        assert!(first.session_id.is_some());
        assert_eq!(first.session_id, second.session_id);
    }

    #[test]
    fn corrupt_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "theme = [").unwrap();
        let store = PreferenceStore::new(&path);

        assert!(store.load().is_err());
        let prefs = store.load_or_init();
        assert!(prefs.theme.is_none());
        assert!(store.load().unwrap().session_id.is_some());
    }
}
