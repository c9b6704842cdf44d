use std::error::Error;
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::error::StoreError;
use crate::models::Bookmark;

use super::file::{read_bookmarks, write_bookmarks};
use super::search::{Matcher, SearchMode};

/// Result of a mutating store call: the value the operation produced plus the
/// outcome of the save that followed it. A failed save never undoes the
/// in-memory change, so callers get the value either way and decide for
/// themselves whether to warn about the stale file.
#[derive(Debug)]
#[must_use]
pub struct Mutation<T> {
    pub value: T,
    pub saved: Result<(), StoreError>,
}

impl<T> Mutation<T> {
    /// Collapse into a plain result, dropping the value if the save failed.
    pub fn into_result(self) -> Result<T, StoreError> {
        self.saved.map(|()| self.value)
    }
}

/// In-memory bookmark collection backed by a single JSON file.
///
/// Every mutation rewrites the whole file before returning. Order is the
/// insertion (or file) order and is never changed by the store.
#[derive(Debug)]
pub struct BookmarkStore {
    path: PathBuf,
    bookmarks: Vec<Bookmark>,
    last_save_error: Option<String>,
}

impl BookmarkStore {
    /// Create a store for `path` without reading it.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bookmarks: Vec::new(),
            last_save_error: None,
        }
    }

    /// Create a store for `path` and load whatever it currently holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::empty(path);
        debug!("Initializing bookmark store with file: {}", store.path.display());
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the collection with the file contents, returning how many
    /// bookmarks were loaded. A missing or unreadable file leaves the store
    /// empty; the failure is only logged.
    pub fn load(&mut self) -> usize {
        self.bookmarks = match read_bookmarks(&self.path) {
            Ok(bookmarks) => {
                debug!(
                    "Loaded {} bookmarks from {}",
                    bookmarks.len(),
                    self.path.display()
                );
                bookmarks
            }
            Err(err) if err.is_missing_file() => {
                error!("Bookmark file not found: {}", self.path.display());
                Vec::new()
            }
            Err(err) => {
                error!("{}", describe(&err));
                Vec::new()
            }
        };
        self.bookmarks.len()
    }

    /// Re-read the backing file, discarding the in-memory collection.
    pub fn reload(&mut self) -> usize {
        self.load()
    }

    /// Overwrite the backing file with the current collection.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.persist()?;
        debug!("Bookmarks saved to {}", self.path.display());
        Ok(())
    }

    /// Message of the most recent failed save, cleared by the next
    /// successful one.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// One past the largest id currently held, or 1 for an empty store. Ids
    /// freed by deleting the current maximum are handed out again. Fails when
    /// the largest id is already `u64::MAX`.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        match self.bookmarks.iter().map(|bookmark| bookmark.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted { max }),
        }
    }

    /// Append a new bookmark under the next free id and persist. Nothing is
    /// appended when no id is left.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        category: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Mutation<Bookmark>, StoreError> {
        let id = self.next_id().inspect_err(|err| error!("{err}"))?;
        let bookmark = Bookmark::new(id, title, category, url);
        self.bookmarks.push(bookmark.clone());
        let saved = self.persist();
        if saved.is_ok() {
            debug!("Bookmark added with ID: {}", bookmark.id);
        }
        Ok(Mutation {
            value: bookmark,
            saved,
        })
    }

    /// Bookmarks whose title, category or URL matches `query` as a
    /// case-insensitive regular expression.
    pub fn search(&self, query: &str) -> Result<Vec<&Bookmark>, StoreError> {
        self.search_with(query, SearchMode::Pattern)
    }

    pub fn search_with(&self, query: &str, mode: SearchMode) -> Result<Vec<&Bookmark>, StoreError> {
        let matcher = Matcher::compile(query, mode)?;
        let results: Vec<&Bookmark> = self
            .bookmarks
            .iter()
            .filter(|bookmark| matcher.matches(bookmark))
            .collect();
        debug!(
            "Found {} results for {} query '{query}'",
            results.len(),
            mode.label()
        );
        Ok(results)
    }

    /// Remove the bookmark with `id`. `value` is false when no such bookmark
    /// exists, in which case the file is left alone.
    pub fn delete(&mut self, id: u64) -> Mutation<bool> {
        let Some(index) = self.position(id) else {
            error!("Bookmark with ID {id} not found for deletion");
            return Mutation {
                value: false,
                saved: Ok(()),
            };
        };

        self.bookmarks.remove(index);
        let saved = self.persist();
        if saved.is_ok() {
            debug!("Bookmark with ID {id} deleted");
        }
        Mutation { value: true, saved }
    }

    /// Overwrite the text fields of the bookmark with `id`. The id itself
    /// never changes.
    pub fn edit(
        &mut self,
        id: u64,
        title: impl Into<String>,
        category: impl Into<String>,
        url: impl Into<String>,
    ) -> Mutation<bool> {
        let Some(index) = self.position(id) else {
            error!("Bookmark with ID {id} not found for editing");
            return Mutation {
                value: false,
                saved: Ok(()),
            };
        };

        let bookmark = &mut self.bookmarks[index];
        bookmark.title = title.into();
        bookmark.category = category.into();
        bookmark.url = url.into();
        let saved = self.persist();
        if saved.is_ok() {
            debug!("Bookmark with ID {id} updated");
        }
        Mutation { value: true, saved }
    }

    pub fn get(&self, id: u64) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|bookmark| bookmark.id == id)
    }

    pub fn list_all(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Write the file, logging only failures; callers log their own success.
    fn persist(&mut self) -> Result<(), StoreError> {
        match write_bookmarks(&self.path, &self.bookmarks) {
            Ok(()) => {
                self.last_save_error = None;
                Ok(())
            }
            Err(err) => {
                let message = describe(&err);
                error!("{message}");
                self.last_save_error = Some(message);
                Err(err)
            }
        }
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.bookmarks.iter().position(|bookmark| bookmark.id == id)
    }
}

/// Flatten an error chain into one line for the log.
fn describe(err: &StoreError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
