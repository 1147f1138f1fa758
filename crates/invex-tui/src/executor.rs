use std::path::PathBuf;
use std::sync::Arc;

use invex_client::Backend;
use invex_core::dispatch::{dispatch, save_download};
use invex_core::preferences::PreferenceStore;
use invex_core::{Completion, Effect};
use tokio::sync::mpsc;

use crate::event::AppEvent;

/// Runs controller effects in the background and reports back on the event channel.
pub struct Executor<B> {
    backend: Arc<B>,
    store: PreferenceStore,
    export_dir: PathBuf,
    tx: mpsc::Sender<AppEvent>,
}

impl<B: Backend + 'static> Executor<B> {
    #[must_use]
    pub fn new(
        backend: Arc<B>,
        store: PreferenceStore,
        export_dir: PathBuf,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            backend,
            store,
            export_dir,
            tx,
        }
    }

    /// Spawn the work for `effect`. Must be called from within a tokio runtime.
    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::Request { ticket, request } => {
                let backend = Arc::clone(&self.backend);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let reply = dispatch(backend.as_ref(), request).await;
                    let event = AppEvent::Completion(Completion { ticket, reply });
                    if tx.send(event).await.is_err() {
                        tracing::debug!(seq = ticket.seq, "event loop gone, completion dropped");
                    }
                });
            }
            Effect::Download { file_name, bytes } => {
                let dir = self.export_dir.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = save_download(&dir, &file_name, &bytes)
                        .await
                        .map_err(|e| e.to_string());
                    if let Err(e) = &result {
                        tracing::warn!(file_name = %file_name, "download failed: {e}");
                    }
                    let _ = tx.send(AppEvent::Saved { file_name, result }).await;
                });
            }
            Effect::SavePreferences(prefs) => {
                let store = self.store.clone();
                tokio::task::spawn_blocking(move || {
                    if let Err(e) = store.save(&prefs) {
                        tracing::warn!(path = %store.path().display(), "failed to save preferences: {e}");
                    }
                });
            }
        }
    }
}
