mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Reject settings the client cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-http(s) backend URL, a zero request timeout or a
    /// zero tick rate.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.backend.base_url)
            .with_context(|| format!("invalid backend.base_url: {}", self.backend.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("backend.base_url must use http or https, got {}", url.scheme());
        }
        if self.backend.timeout_secs == 0 {
            bail!("backend.timeout_secs must be greater than zero");
        }
        if self.ui.tick_rate_ms == 0 {
            bail!("ui.tick_rate_ms must be greater than zero");
        }
        Ok(())
    }
}
