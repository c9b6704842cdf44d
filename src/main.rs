//! Binary entry point: resolve configuration, start file logging, load the
//! bookmark file, and drive the Ratatui event loop until the user exits.
use clap::Parser;
use log::info;

use bookmark_me::{logging, run_app, App, Args, BookmarkStore, Config};

/// Returning a `Result` bubbles fatal startup problems (no home directory, an
/// unwritable log location, no terminal) up to the shell. Nothing the store
/// does once running is fatal.
fn main() -> anyhow::Result<()> {
    let config = Config::from_args(Args::parse())?;
    logging::init(&config.log_path)?;
    info!("Launching BookmarkMe");

    let store = BookmarkStore::open(&config.bookmarks_path);
    let mut app = App::new(store);
    let result = run_app(&mut app);

    info!("BookmarkMe closed");
    result
}
