//! Application core for invex: configuration, state, controller and view model.
//!
//! The front end feeds [`controller::Action`]s to [`controller::update`], runs the
//! returned [`controller::Effect`]s (backend requests through [`dispatch`], downloads,
//! preference writes) and folds completions back with [`controller::apply`]. What to
//! draw comes from [`view::render`].

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod document;
pub mod export;
pub mod preferences;
pub mod sequence;
pub mod state;
pub mod tables;
pub mod transcript;
pub mod view;

pub use config::Config;
pub use controller::{Action, Completion, Effect};
pub use state::AppState;
