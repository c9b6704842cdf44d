use regex::{Regex, RegexBuilder};

use crate::error::StoreError;
use crate::models::Bookmark;

/// How a search query is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Case-insensitive regular expression, matched anywhere in a field.
    #[default]
    Pattern,
    /// Case-insensitive plain substring.
    Literal,
}

impl SearchMode {
    pub fn toggle(self) -> Self {
        match self {
            SearchMode::Pattern => SearchMode::Literal,
            SearchMode::Literal => SearchMode::Pattern,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchMode::Pattern => "regex",
            SearchMode::Literal => "literal",
        }
    }
}

/// A compiled query, ready to test bookmarks against.
#[derive(Debug)]
pub(crate) struct Matcher {
    regex: Regex,
}

impl Matcher {
    pub(crate) fn compile(query: &str, mode: SearchMode) -> Result<Self, StoreError> {
        let source = match mode {
            SearchMode::Pattern => query.to_string(),
            SearchMode::Literal => regex::escape(query),
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|source| StoreError::InvalidPattern {
                pattern: query.to_string(),
                source,
            })?;

        Ok(Self { regex })
    }

    /// A bookmark matches when any of its three text fields does.
    pub(crate) fn matches(&self, bookmark: &Bookmark) -> bool {
        self.regex.is_match(&bookmark.title)
            || self.regex.is_match(&bookmark.category)
            || self.regex.is_match(&bookmark.url)
    }
}
