//! Floor Plan Application
//!
//! The command-line shell: opens plans from a store, dispatches editing
//! actions and renders the canvas.

mod actions;
mod app;
mod shortcuts;

pub use actions::UiAction;
pub use app::{App, AppError, create_plan};
pub use shortcuts::{Shortcut, ShortcutRegistry};
