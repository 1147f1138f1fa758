use std::path::PathBuf;

use super::Config;
use crate::preferences::Theme;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("INVEX_BACKEND_URL") {
            self.backend.base_url = v;
        }
        if let Ok(v) = std::env::var("INVEX_BACKEND_TIMEOUT") {
            if let Ok(secs) = v.parse::<u64>() {
                self.backend.timeout_secs = secs;
            } else {
                tracing::warn!("ignoring invalid INVEX_BACKEND_TIMEOUT value: {v}");
            }
        }
        if let Ok(v) = std::env::var("INVEX_BACKEND_MAX_RETRIES") {
            if let Ok(n) = v.parse::<u32>() {
                self.backend.max_retries = n;
            } else {
                tracing::warn!("ignoring invalid INVEX_BACKEND_MAX_RETRIES value: {v}");
            }
        }
        if let Ok(v) = std::env::var("INVEX_EXPORT_DIR") {
            self.export.dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("INVEX_EXPORT_TIMESTAMPED") {
            if let Some(enabled) = parse_flag(&v) {
                self.export.timestamped_names = enabled;
            } else {
                tracing::warn!(
                    "ignoring invalid INVEX_EXPORT_TIMESTAMPED value: {v} (expected true/false, 1/0, yes/no or on/off)"
                );
            }
        }
        if let Ok(v) = std::env::var("INVEX_PREFERENCES_PATH") {
            self.storage.preferences_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("INVEX_THEME") {
            if let Ok(theme) = v.parse::<Theme>() {
                self.ui.default_theme = theme;
            } else {
                tracing::warn!("ignoring invalid INVEX_THEME value: {v}");
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
