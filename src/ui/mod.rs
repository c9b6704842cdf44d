//! Ratatui front end: a tabbed list plus search view, with modal forms for
//! adding, editing and deleting bookmarks. All user-facing validation lives
//! here; the store accepts whatever it is given.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
