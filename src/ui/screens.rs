use anyhow::Result;

use crate::models::Bookmark;
use crate::store::{BookmarkStore, SearchMode};

use super::helpers::{last_line, surface_error};

/// Tabs along the top of the window.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Tab {
    All,
    Search,
}

impl Tab {
    pub(crate) const TITLES: [&'static str; 2] = ["All Bookmarks", "Search"];

    pub(crate) fn index(self) -> usize {
        match self {
            Tab::All => 0,
            Tab::Search => 1,
        }
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Tab::All => Tab::Search,
            Tab::Search => Tab::All,
        }
    }
}

/// Clamp `selected + offset` into `0..len`.
fn offset_selection(selected: usize, offset: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let target = selected as isize + offset;
    target.clamp(0, len as isize - 1) as usize
}

/// Snapshot of the store used by the "All Bookmarks" table.
pub(crate) struct ListScreen {
    pub(crate) bookmarks: Vec<Bookmark>,
    pub(crate) selected: usize,
}

impl ListScreen {
    pub(crate) fn new(bookmarks: Vec<Bookmark>) -> Self {
        let mut screen = Self {
            bookmarks,
            selected: 0,
        };
        screen.ensure_in_bounds();
        screen
    }

    /// Replace the snapshot, optionally moving the cursor to `focus_id`.
    pub(crate) fn set_bookmarks(&mut self, bookmarks: Vec<Bookmark>, focus_id: Option<u64>) {
        self.bookmarks = bookmarks;
        if let Some(id) = focus_id {
            if let Some(idx) = self.bookmarks.iter().position(|b| b.id == id) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn current(&self) -> Option<&Bookmark> {
        self.bookmarks.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = offset_selection(self.selected, offset, self.bookmarks.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.bookmarks.len().saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        if self.selected >= self.bookmarks.len() {
            self.selected = self.bookmarks.len().saturating_sub(1);
        }
    }
}

/// Live search over the store. Results are copied out so the table can be
/// drawn without borrowing the store.
#[derive(Default)]
pub(crate) struct SearchScreen {
    pub(crate) query: String,
    pub(crate) mode: SearchMode,
    pub(crate) results: Vec<Bookmark>,
    pub(crate) selected: usize,
    pub(crate) error: Option<String>,
}

impl SearchScreen {
    /// Re-run the query. An empty query clears the results; a malformed
    /// pattern keeps the previous results that still exist in the store and
    /// records the error.
    pub(crate) fn refresh(&mut self, store: &BookmarkStore) -> Result<()> {
        let query = self.query.trim();
        if query.is_empty() {
            self.results.clear();
            self.error = None;
            self.selected = 0;
            return Ok(());
        }

        match store.search_with(query, self.mode) {
            Ok(found) => {
                self.results = found.into_iter().cloned().collect();
                self.error = None;
                self.ensure_in_bounds();
                Ok(())
            }
            Err(err) => {
                self.sync_with(store);
                let err = anyhow::Error::from(err);
                self.error = Some(format!("{err}: {}", last_line(&surface_error(&err))));
                Err(err)
            }
        }
    }

    pub(crate) fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub(crate) fn toggle_mode(&mut self) -> SearchMode {
        self.mode = self.mode.toggle();
        self.mode
    }

    pub(crate) fn current(&self) -> Option<&Bookmark> {
        self.results.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = offset_selection(self.selected, offset, self.results.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.results.len().saturating_sub(1);
    }

    /// Drop kept results that were deleted and pick up edits to the rest.
    fn sync_with(&mut self, store: &BookmarkStore) {
        self.results = self
            .results
            .iter()
            .filter_map(|bookmark| store.get(bookmark.id).cloned())
            .collect();
        self.ensure_in_bounds();
    }

    fn ensure_in_bounds(&mut self) {
        if self.selected >= self.results.len() {
            self.selected = self.results.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn sample_list() -> Vec<Bookmark> {
        vec![
            Bookmark::new(1, "a", "", "u"),
            Bookmark::new(2, "b", "", "u"),
            Bookmark::new(5, "c", "", "u"),
        ]
    }

    #[test]
    fn selection_is_clamped() {
        let mut screen = ListScreen::new(sample_list());
        screen.move_selection(-3);
        assert_eq!(screen.selected, 0);
        screen.move_selection(10);
        assert_eq!(screen.selected, 2);
    }

    #[test]
    fn set_bookmarks_focuses_requested_id() {
        let mut screen = ListScreen::new(Vec::new());
        screen.set_bookmarks(sample_list(), Some(5));
        assert_eq!(screen.current().map(|b| b.id), Some(5));
    }

    #[test]
    fn shrinking_list_pulls_selection_back() {
        let mut screen = ListScreen::new(sample_list());
        screen.select_last();
        screen.set_bookmarks(sample_list()[..1].to_vec(), None);
        assert_eq!(screen.selected, 0);
        screen.set_bookmarks(Vec::new(), None);
        assert!(screen.current().is_none());
    }

    #[test]
    fn search_refresh_tracks_query_and_errors() {
        let dir = tempdir().unwrap();
        let mut store = BookmarkStore::empty(dir.path().join("bookmarks.json"));
        store
            .add("Rust Book", "Programming", "https://doc.rust-lang.org")
            .unwrap()
            .saved
            .unwrap();
        store
            .add("Go (docs)", "Programming", "https://go.dev")
            .unwrap()
            .saved
            .unwrap();

        let mut screen = SearchScreen::default();
        screen.refresh(&store).unwrap();
        assert!(screen.results.is_empty());

        screen.query = "RUST".to_string();
        screen.refresh(&store).unwrap();
        assert_eq!(screen.results.len(), 1);

        screen.query = "(docs".to_string();
        assert!(screen.refresh(&store).is_err());
        assert!(screen.error.is_some());
        assert_eq!(screen.results.len(), 1);

        assert_eq!(screen.toggle_mode(), SearchMode::Literal);
        screen.refresh(&store).unwrap();
        assert!(screen.error.is_none());
        assert_eq!(screen.current().map(|b| b.id), Some(2));
    }

    #[test]
    fn failed_refresh_drops_results_deleted_from_the_store() {
        let dir = tempdir().unwrap();
        let mut store = BookmarkStore::empty(dir.path().join("bookmarks.json"));
        store.add("Docs one", "", "u").unwrap().saved.unwrap();
        store.add("Docs two", "", "u").unwrap().saved.unwrap();

        let mut screen = SearchScreen {
            query: "docs".to_string(),
            ..SearchScreen::default()
        };
        screen.refresh(&store).unwrap();
        screen.select_last();

        assert!(store.delete(2).value);
        assert!(store.edit(1, "Docs renamed", "", "u").value);
        screen.query = "docs(".to_string();
        assert!(screen.refresh(&store).is_err());

        assert_eq!(screen.results, [Bookmark::new(1, "Docs renamed", "", "u")]);
        assert_eq!(screen.selected, 0);
    }
}
