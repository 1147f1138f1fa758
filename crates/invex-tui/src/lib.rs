//! Terminal front end for invex.
//!
//! [`App`] owns the [`invex_core::AppState`] and maps keys to controller actions;
//! [`Executor`] runs the resulting effects and feeds completions back through the
//! same event channel the [`EventReader`] writes to.

pub mod app;
pub mod error;
pub mod event;
pub mod executor;
pub mod layout;
#[cfg(test)]
pub mod test_utils;
pub mod theme;
pub mod widgets;

use std::io;
use std::time::Duration;

pub use app::App;
pub use error::TuiError;
pub use event::{AppEvent, EventReader};
pub use executor::Executor;
use invex_client::Backend;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

/// # Errors
///
/// Returns an error if terminal init/restore or rendering fails, or if the event
/// channel closes before the user quits.
pub async fn run_tui<B: Backend + 'static>(
    mut app: App,
    executor: Executor<B>,
    mut event_rx: mpsc::Receiver<AppEvent>,
    tick_rate: Duration,
) -> Result<(), TuiError> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        original_hook(info);
    }));

    let mut terminal = init_terminal()?;
    let result = tui_loop(&mut app, &executor, &mut event_rx, &mut terminal, tick_rate).await;
    restore_terminal(&mut terminal)?;

    let _ = std::panic::take_hook();
    result
}

async fn tui_loop<B: Backend + 'static>(
    app: &mut App,
    executor: &Executor<B>,
    event_rx: &mut mpsc::Receiver<AppEvent>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    tick_rate: Duration,
) -> Result<(), TuiError> {
    let mut tick = tokio::time::interval(tick_rate);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        for effect in app.take_effects() {
            executor.run(effect);
        }
        terminal.draw(|frame| app.draw(frame))?;

        tokio::select! {
            biased;
            event = event_rx.recv() => match event {
                Some(event) => app.handle_event(event),
                None => return Err(TuiError::ChannelClosed),
            },
            _ = tick.tick() => {}
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, TuiError> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture,
    )?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), TuiError> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture,
    )?;
    terminal.show_cursor()?;
    Ok(())
}
