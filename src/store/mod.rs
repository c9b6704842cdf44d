//! Bookmark persistence split across logical submodules.

mod bookmarks;
mod file;
mod search;

pub use bookmarks::{BookmarkStore, Mutation};
pub use search::SearchMode;
