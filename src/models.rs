//! The bookmark record that flows between the store, the JSON file, and the
//! TUI. It is a plain data holder: validation of titles and URLs belongs to the
//! forms in the UI layer, not here.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single stored bookmark.
///
/// Every field falls back to its default (`0` or an empty string) when the
/// key is absent from the decoded object, so hand-edited files with missing
/// keys still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bookmark {
    /// Assigned by the store. Unique among the bookmarks currently held.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u64,
    /// Display name shown in lists and search results.
    pub title: String,
    /// Free-text grouping label, may be blank.
    pub category: String,
    /// Kept as raw text; nothing checks that it parses as a URL.
    pub url: String,
}

impl Bookmark {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        category: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            category: category.into(),
            url: url.into(),
        }
    }

    /// Convert into a key-value mapping with the keys `id`, `title`,
    /// `category` and `url`.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id));
        map.insert("title".to_string(), Value::from(self.title.clone()));
        map.insert("category".to_string(), Value::from(self.category.clone()));
        map.insert("url".to_string(), Value::from(self.url.clone()));
        map
    }

    /// Build a bookmark from a key-value mapping, substituting defaults for
    /// missing keys. Keys that are present with the wrong type are an error.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map.clone()))
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID:{} | Title: {} | Category: {} | URL: {}",
            self.id, self.title, self.category, self.url
        )
    }
}

/// Accept ids written either as JSON integers or as digit strings. Older
/// files produced by other tools stored ids as text.
fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| de::Error::custom(format!("invalid bookmark id `{text}`"))),
    }
}
