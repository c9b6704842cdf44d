use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::StoreError;
use crate::models::Bookmark;

/// Indentation used when writing the bookmark file, so hand edits diff cleanly
/// against files written by earlier releases.
const INDENT: &[u8] = b"    ";

/// Read and decode the whole bookmark file.
pub(crate) fn read_bookmarks(path: &Path) -> Result<Vec<Bookmark>, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrite the bookmark file with the given collection, creating the parent
/// directory when it is missing.
pub(crate) fn write_bookmarks(path: &Path, bookmarks: &[Bookmark]) -> Result<(), StoreError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    bookmarks
        .serialize(&mut serializer)
        .map_err(StoreError::Encode)?;
    buffer.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, buffer).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn written_file_reads_back_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        let bookmarks = vec![
            Bookmark::new(2, "Second", "B", "https://b"),
            Bookmark::new(1, "First", "A", "https://a"),
        ];

        write_bookmarks(&path, &bookmarks).unwrap();
        assert_eq!(read_bookmarks(&path).unwrap(), bookmarks);
    }

    #[test]
    fn writes_four_space_indented_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        write_bookmarks(&path, &[Bookmark::new(1, "Example", "Docs", "https://example.com")])
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let expected = "[\n    {\n        \"id\": 1,\n        \"title\": \"Example\",\n        \"category\": \"Docs\",\n        \"url\": \"https://example.com\"\n    }\n]\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("bookmarks.json");
        write_bookmarks(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempdir().unwrap();
        let err = read_bookmarks(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_missing_file());
    }

    #[test]
    fn non_array_document_is_a_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, r#"{"id": 1, "title": "not in a list"}"#).unwrap();

        let err = read_bookmarks(&path).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
        assert!(!err.is_missing_file());
    }

    #[test]
    fn writing_over_a_directory_fails_with_write_error() {
        let dir = tempdir().unwrap();
        let err = write_bookmarks(dir.path(), &[]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
