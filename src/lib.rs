//! Core library surface for BookmarkMe, a terminal bookmark manager backed by
//! a single JSON file.
//!
//! The `bin` target only glues these pieces together; tests and other tooling
//! can drive the store directly without a terminal.
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Explicit runtime configuration resolved from flags and the environment.
pub use config::{Args, Config};

/// Error type for persistence and search failures.
pub use error::StoreError;

/// The record type every layer manipulates.
pub use models::Bookmark;

/// The persistence layer.
pub use store::{BookmarkStore, Mutation, SearchMode};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
