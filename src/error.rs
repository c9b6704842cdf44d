use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the bookmark store. Load failures never reach callers
/// (the store falls back to an empty collection), but they share this type so
/// the log records read the same as save failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} does not contain a bookmark list", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode bookmarks")]
    Encode(#[source] serde_json::Error),

    #[error("invalid search pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no bookmark id is left above {max}")]
    IdsExhausted { max: u64 },
}

impl StoreError {
    /// True when the error means the backing file simply does not exist yet,
    /// which is the normal state on first run.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, StoreError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
