use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use invex_client::HttpBackend;
use invex_client::http::default_client;
use invex_core::controller::Action;
use invex_core::preferences::PreferenceStore;
use invex_core::state::Settings;
use invex_core::{AppState, Config};
use invex_tui::{App, EventReader, Executor};

const LOG_FILE: &str = "invex.log";

/// Terminal front end for an invoice-extraction backend.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (default: $INVEX_CONFIG, then config/default.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file and environment
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Upload this invoice at start-up
    #[arg(long, value_name = "FILE")]
    open: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // The TUI owns the terminal, so logs go to a file.
    init_tracing(Path::new(LOG_FILE));

    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path)?;
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
    }
    config.validate()?;
    tracing::info!(path = %config_path.display(), backend = %config.backend.base_url, "starting invex");

    let store = PreferenceStore::new(&config.storage.preferences_path);
    let preferences = store.load_or_init();

    let client = default_client(config.backend.connect_timeout(), config.backend.timeout());
    let backend = HttpBackend::new(client, config.backend.base_url.clone())
        .with_max_retries(config.backend.max_retries);

    let settings = Settings {
        base_url: config.backend.base_url.clone(),
        timestamped_names: config.export.timestamped_names,
    };
    let state = AppState::new(settings, preferences, config.ui.default_theme);
    let mut app = App::new(state);
    if let Some(path) = cli.open {
        app.dispatch(Action::SelectFile(path));
    }

    let (event_tx, event_rx) = tokio::sync::mpsc::channel(256);
    let executor = Executor::new(
        Arc::new(backend),
        store,
        config.export.dir.clone(),
        event_tx.clone(),
    );
    let reader = EventReader::new(event_tx, config.ui.tick_rate());
    std::thread::spawn(move || reader.run());

    invex_tui::run_tui(app, executor, event_rx, config.ui.tick_rate())
        .await
        .context("terminal UI failed")?;
    tracing::info!("invex exited");
    Ok(())
}

fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("INVEX_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

fn init_tracing(log_path: &Path) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match std::fs::File::create(log_path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(file)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}
