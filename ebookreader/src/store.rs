//! Book store - the books directory and the in-memory list
//!
//! `Shelf` does the file work and is cheap to clone onto worker threads.
//! `BookStore` owns the list and is the only thing that mutates it.

use crate::book::{Book, BookError, Result, BOOK_EXTENSION};
use crate::source::{ContentResolver, SourceLocator};
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

/// Lines read from a source to decide it has content
const PREVIEW_LINES: usize = 5;

/// Characters of the preview written to the log
const PREVIEW_LOG_CHARS: usize = 100;

pub type SharedResolver = Arc<dyn ContentResolver>;

#[derive(Clone)]
pub struct Shelf {
    dir: PathBuf,
    resolver: SharedResolver,
}

impl Shelf {
    pub fn new(dir: PathBuf, resolver: SharedResolver) -> Self {
        Self { dir, resolver }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Derive a record for every stored `.txt` file. Never fails: problems
    /// are logged and leave the result empty or partial.
    pub fn scan(&self) -> Vec<Book> {
        if !self.dir.exists() {
            debug!(dir = %self.dir.display(), "books directory missing, creating it");
            if let Err(e) = fs::create_dir_all(&self.dir) {
                error!(dir = %self.dir.display(), "failed to create books directory: {}", e);
            }
            return Vec::new();
        }

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!(dir = %self.dir.display(), "failed to list books directory: {}", e);
                return Vec::new();
            }
        };

        let mut books: Vec<Book> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if !path.is_file() || !has_book_extension(&path) {
                    return None;
                }
                let book = Book::from_file(&path)?;
                debug!(id = %book.id, path = %path.display(), "found stored book");
                Some(book)
            })
            .collect();

        books.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        info!(count = books.len(), "loaded stored books");
        books
    }

    /// Copy `source` into the books directory under a name derived from
    /// `title`, replacing any file of that name.
    pub fn import(&self, source: &SourceLocator, title: &str) -> Result<Book> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BookError::import("title is empty"));
        }
        debug!(%source, title, "importing book");

        let preview = self.preview(source)?;
        debug!(preview = %snippet(&preview), "source has content");

        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(Book::file_name_for_title(title));

        // Each import stages into its own temp file; it is removed on drop
        // unless persisted.
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        let copied = self.copy_into(source, &mut staged)?;
        debug!(bytes = copied, "copied source");
        if copied == 0 {
            return Err(BookError::import("no bytes were copied"));
        }

        if target.exists() {
            debug!(path = %target.display(), "overwriting existing book file");
        }
        staged.persist(&target).map_err(|e| BookError::Io(e.error))?;

        if fs::metadata(&target)?.len() == 0 {
            discard(&target);
            return Err(BookError::import("stored file is empty"));
        }

        let book = Book::imported(source.clone(), title, target);
        info!(id = %book.id, title, "imported book");
        Ok(book)
    }

    /// Read a book's content, preferring the stored copy and falling back
    /// to the source it was imported from.
    pub fn read(&self, book: &Book) -> Result<String> {
        let mut failure: Option<io::Error> = None;

        match &book.stored_path {
            Some(path) => match fs::read(path) {
                Ok(bytes) if !bytes.is_empty() => return Ok(decode(bytes)),
                Ok(_) => warn!(path = %path.display(), "stored file is empty"),
                Err(e) => note_failure(&mut failure, "stored file", e),
            },
            None => debug!(id = %book.id, "book has no stored path"),
        }

        match &book.source_locator {
            Some(source) => match self.read_source(source) {
                Ok(bytes) if !bytes.is_empty() => {
                    debug!(%source, "read content from source");
                    return Ok(decode(bytes));
                }
                Ok(_) => warn!(%source, "source is empty"),
                Err(e) => note_failure(&mut failure, "source", e),
            },
            None => debug!(id = %book.id, "book has no source locator"),
        }

        warn!(id = %book.id, "no readable content");
        match failure {
            Some(e) => Err(BookError::Io(e)),
            None => Err(BookError::NotFound(book.id.clone())),
        }
    }

    /// Best-effort removal of a book's stored file
    pub fn delete_file(&self, book: &Book) {
        match &book.stored_path {
            Some(path) => match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "deleted book file"),
                Err(e) => warn!(path = %path.display(), "failed to delete book file: {}", e),
            },
            None => warn!(id = %book.id, "book has no stored path, nothing to delete"),
        }
    }

    fn preview(&self, source: &SourceLocator) -> Result<String> {
        let reader = self.open_source(source)?;
        let mut reader = BufReader::new(reader);
        let mut preview = Vec::new();
        let mut lines = 0;
        while lines < PREVIEW_LINES {
            let read = reader
                .read_until(b'\n', &mut preview)
                .map_err(|e| BookError::import(format!("cannot read {}: {}", source, e)))?;
            if read == 0 {
                break;
            }
            lines += 1;
        }
        if lines == 0 {
            return Err(BookError::import(format!("{} is empty", source)));
        }
        Ok(String::from_utf8_lossy(&preview).into_owned())
    }

    fn copy_into(&self, source: &SourceLocator, staged: &mut NamedTempFile) -> Result<u64> {
        let mut reader = self.open_source(source)?;
        let copied = io::copy(&mut reader, staged.as_file_mut())?;
        staged.as_file().sync_all()?;
        Ok(copied)
    }

    fn open_source(&self, source: &SourceLocator) -> Result<Box<dyn Read + Send>> {
        self.resolver
            .open(source)
            .map_err(|e| BookError::import(format!("cannot open {}: {}", source, e)))
    }

    fn read_source(&self, source: &SourceLocator) -> io::Result<Vec<u8>> {
        let mut reader = self.resolver.open(source)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

fn has_book_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e == BOOK_EXTENSION)
        .unwrap_or(false)
}

fn note_failure(failure: &mut Option<io::Error>, what: &str, e: io::Error) {
    if e.kind() == io::ErrorKind::NotFound {
        warn!("{} does not exist", what);
    } else {
        error!("failed to read {}: {}", what, e);
        *failure = Some(e);
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), "failed to remove empty book file: {}", e);
        }
    }
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn snippet(text: &str) -> String {
    text.chars().take(PREVIEW_LOG_CHARS).collect()
}

/// The library's books, owned in one place
pub struct BookStore {
    shelf: Shelf,
    books: Vec<Book>,
}

impl BookStore {
    /// Open the store at `dir`, creating it if needed, and load what is
    /// already stored there.
    pub fn open(dir: PathBuf, resolver: SharedResolver) -> Self {
        let shelf = Shelf::new(dir, resolver);
        let books = shelf.scan();
        Self { shelf, books }
    }

    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }

    pub fn list_stored_books(&self) -> Vec<Book> {
        self.shelf.scan()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn import_book(&mut self, source: &SourceLocator, title: &str) -> Result<Book> {
        let book = self.shelf.import(source, title)?;
        self.insert(book.clone());
        Ok(book)
    }

    /// Add a record, replacing any with the same id
    pub fn insert(&mut self, book: Book) {
        match self.books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => *existing = book,
            None => self.books.push(book),
        }
    }

    pub fn read_content(&self, id: &str) -> Result<String> {
        let book = self
            .get(id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;
        self.shelf.read(book)
    }

    /// Drop a record and its stored file. `None` if the id is unknown.
    pub fn remove_book(&mut self, id: &str) -> Option<Book> {
        let index = self.books.iter().position(|b| b.id == id)?;
        let book = self.books.remove(index);
        debug!(id, title = %book.title, "removed book from library");
        self.shelf.delete_file(&book);
        Some(book)
    }
}
