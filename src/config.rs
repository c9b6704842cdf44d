//! Command-line and environment configuration. Everything resolves into an
//! explicit [`Config`] that `main` hands to the store and the logger, so no
//! module reaches for a global default path on its own.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".bookmark-me";
/// Bookmark file stored inside the application data directory.
const BOOKMARKS_FILE_NAME: &str = "bookmarks.json";
/// Log file stored next to the bookmarks.
const LOG_FILE_NAME: &str = "bookmark-me.log";

/// Terminal bookmark manager backed by a JSON file.
#[derive(Debug, Parser)]
#[command(name = "bookmark-me", version)]
pub struct Args {
    /// Bookmark file to load and save.
    #[arg(long, env = "BOOKMARKME_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// File that receives debug and error log records.
    #[arg(long, env = "BOOKMARKME_LOG", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bookmarks_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Resolve the arguments against the user's home directory.
    pub fn from_args(args: Args) -> Result<Self> {
        let home = home_dir()?;
        Ok(Self::resolve(args, &home))
    }

    /// Fill in defaults beneath `home` and expand `~/` prefixes.
    pub fn resolve(args: Args, home: &Path) -> Self {
        let data_dir = home.join(DATA_DIR_NAME);
        let bookmarks_path = args
            .file
            .map(|path| expand_home(&path, home))
            .unwrap_or_else(|| data_dir.join(BOOKMARKS_FILE_NAME));
        let log_path = args
            .log_file
            .map(|path| expand_home(&path, home))
            .unwrap_or_else(|| data_dir.join(LOG_FILE_NAME));

        Self {
            bookmarks_path,
            log_path,
        }
    }
}

/// Resolve the user's home directory.
fn home_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().to_path_buf())
}

/// Replace a leading `~` component with `home`.
fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
