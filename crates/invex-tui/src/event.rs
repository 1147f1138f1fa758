use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEventKind};
use invex_core::Completion;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
    MouseScroll(i8),
    /// A backend request finished.
    Completion(Completion),
    /// A download was written to disk, or failed to be.
    Saved {
        file_name: String,
        result: Result<PathBuf, String>,
    },
}

pub struct EventReader {
    tx: mpsc::Sender<AppEvent>,
    tick_rate: Duration,
}

impl EventReader {
    #[must_use]
    pub fn new(tx: mpsc::Sender<AppEvent>, tick_rate: Duration) -> Self {
        Self { tx, tick_rate }
    }

    /// Blocking loop, run it on a dedicated `std::thread`.
    pub fn run(self) {
        loop {
            if event::poll(self.tick_rate).unwrap_or(false) {
                let evt = match event::read() {
                    Ok(CrosstermEvent::Key(key)) => AppEvent::Key(key),
                    Ok(CrosstermEvent::Resize(w, h)) => AppEvent::Resize(w, h),
                    Ok(CrosstermEvent::Mouse(mouse)) => match mouse.kind {
                        MouseEventKind::ScrollUp => AppEvent::MouseScroll(1),
                        MouseEventKind::ScrollDown => AppEvent::MouseScroll(-1),
                        _ => continue,
                    },
                    _ => continue,
                };
                if self.tx.blocking_send(evt).is_err() {
                    break;
                }
            } else if self.tx.blocking_send(AppEvent::Tick).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_event_debug_names_variant() {
        let e = AppEvent::Saved {
            file_name: "invoice_data.json".into(),
            result: Err("disk full".into()),
        };
        let s = format!("{e:?}");
        assert!(s.contains("Saved"));
        assert!(s.contains("disk full"));
    }
}
