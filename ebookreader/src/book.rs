//! Book records and the errors the store reports

use crate::source::SourceLocator;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of stored book files
pub const BOOK_EXTENSION: &str = "txt";

/// A book known to the library
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Where the book was imported from; absent for books found on disk
    pub source_locator: Option<SourceLocator>,
    /// The app-private copy, the canonical source for reads
    pub stored_path: Option<PathBuf>,
}

impl Book {
    /// Derive the id (and file stem) for a title. Spaces and path
    /// separators become `_`, so the file always lands in the books dir.
    pub fn id_for_title(title: &str) -> String {
        title
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' | '\0' => '_',
                c => c,
            })
            .collect()
    }

    pub fn file_name_for_title(title: &str) -> String {
        format!("{}.{}", Self::id_for_title(title), BOOK_EXTENSION)
    }

    /// Reconstruct a record from a stored file
    pub fn from_file(path: &Path) -> Option<Self> {
        let id = path.file_stem()?.to_string_lossy().into_owned();
        let title = id.replace('_', " ");
        Some(Self {
            description: describe(&title),
            id,
            title,
            source_locator: None,
            stored_path: Some(path.to_path_buf()),
        })
    }

    pub fn imported(source: SourceLocator, title: &str, stored_path: PathBuf) -> Self {
        Self {
            id: Self::id_for_title(title),
            title: title.to_string(),
            description: describe(title),
            source_locator: Some(source),
            stored_path: Some(stored_path),
        }
    }
}

fn describe(title: &str) -> String {
    format!("Imported book: {}", title)
}

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Book not found: {0}")]
    NotFound(String),
    #[error("Import failed: {reason}")]
    Import { reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BookError {
    pub(crate) fn import(reason: impl Into<String>) -> Self {
        Self::Import {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_replaces_spaces() {
        assert_eq!(Book::id_for_title("War and Peace"), "War_and_Peace");
        assert_eq!(Book::file_name_for_title("War and Peace"), "War_and_Peace.txt");
    }

    #[test]
    fn test_id_cannot_escape_books_dir() {
        assert_eq!(Book::id_for_title("../etc/passwd"), ".._etc_passwd");
        assert_eq!(Book::id_for_title("a\\b"), "a_b");
    }

    #[test]
    fn test_from_file_matches_imported_id() {
        let stored = PathBuf::from("/books/War_and_Peace.txt");
        let scanned = Book::from_file(&stored).unwrap();
        let imported = Book::imported(
            SourceLocator::new("/src.txt"),
            "War and Peace",
            stored.clone(),
        );

        assert_eq!(scanned.id, imported.id);
        assert_eq!(scanned.title, "War and Peace");
        assert_eq!(scanned.description, "Imported book: War and Peace");
        assert_eq!(scanned.stored_path, Some(stored));
        assert_eq!(scanned.source_locator, None);
    }
}
