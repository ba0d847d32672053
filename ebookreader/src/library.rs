//! Library - what the window shows, driven by the store and background tasks

use crate::book::{Book, BookError};
use crate::source::SourceLocator;
use crate::store::BookStore;
use crate::tasks::{Notifier, TaskOutcome, TaskRunner};
use tracing::{debug, error, info};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportStatus {
    Idle,
    Loading,
    Success(Book),
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentState {
    Loading,
    Ready(String),
    Failed(String),
}

/// The book currently shown in the reader
#[derive(Clone, Debug)]
pub struct OpenBook {
    pub id: String,
    pub title: String,
    pub content: ContentState,
}

pub struct Library {
    store: BookStore,
    tasks: TaskRunner,
    import_status: ImportStatus,
    open: Option<OpenBook>,
}

impl Library {
    pub fn new(store: BookStore) -> Self {
        Self {
            store,
            tasks: TaskRunner::new(),
            import_status: ImportStatus::Idle,
            open: None,
        }
    }

    /// Wake the UI whenever a background task finishes
    pub fn set_notifier(&mut self, notifier: Notifier) {
        self.tasks.set_notifier(notifier);
    }

    pub fn books(&self) -> &[Book] {
        self.store.books()
    }

    pub fn import_status(&self) -> &ImportStatus {
        &self.import_status
    }

    pub fn open_book(&self) -> Option<&OpenBook> {
        self.open.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.tasks.is_busy()
    }

    pub fn import_book(&mut self, source: SourceLocator, title: String) {
        info!(%source, title = %title, "starting import");
        self.import_status = ImportStatus::Loading;
        self.tasks.import(self.store.shelf(), source, title);
    }

    pub fn reset_import_status(&mut self) {
        self.import_status = ImportStatus::Idle;
    }

    pub fn load_book_content(&mut self, id: &str) {
        let Some(book) = self.store.get(id) else {
            error!(id, "cannot open unknown book");
            self.open = Some(OpenBook {
                id: id.to_string(),
                title: id.to_string(),
                content: ContentState::Failed(BookError::NotFound(id.to_string()).to_string()),
            });
            return;
        };
        debug!(id, title = %book.title, "loading book content");
        self.open = Some(OpenBook {
            id: book.id.clone(),
            title: book.title.clone(),
            content: ContentState::Loading,
        });
        let book = book.clone();
        self.tasks.load(self.store.shelf(), book);
    }

    pub fn close_book(&mut self) {
        self.open = None;
    }

    pub fn remove_book(&mut self, id: &str) -> Option<Book> {
        if self.open.as_ref().is_some_and(|open| open.id == id) {
            self.open = None;
        }
        self.store.remove_book(id)
    }

    /// Apply every finished task. Returns whether anything changed.
    pub fn update(&mut self) -> bool {
        let outcomes = self.tasks.poll();
        let changed = !outcomes.is_empty();
        for outcome in outcomes {
            self.apply(outcome);
        }
        changed
    }

    /// Block until every pending task has been applied
    pub fn wait_idle(&mut self) {
        while let Some(outcome) = self.tasks.wait() {
            self.apply(outcome);
        }
    }

    fn apply(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Imported { title, result } => match result {
                Ok(book) => {
                    info!(id = %book.id, "import finished");
                    self.store.insert(book.clone());
                    self.import_status = ImportStatus::Success(book);
                }
                Err(e) => {
                    error!(title = %title, "import failed: {}", e);
                    self.import_status = ImportStatus::Error(e.to_string());
                }
            },
            TaskOutcome::Loaded { id, result } => {
                let Some(open) = self.open.as_mut().filter(|open| open.id == id) else {
                    debug!(id = %id, "dropping content for a book that is no longer open");
                    return;
                };
                open.content = match result {
                    Ok(content) => {
                        debug!(id = %id, len = content.len(), "book content loaded");
                        ContentState::Ready(content)
                    }
                    Err(e) => {
                        error!(id = %id, "failed to load book content: {}", e);
                        ContentState::Failed(e.to_string())
                    }
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FsResolver;
    use std::sync::Arc;

    fn library_in(dir: &tempfile::TempDir) -> Library {
        Library::new(BookStore::open(dir.path().join("books"), Arc::new(FsResolver)))
    }

    fn source_in(dir: &tempfile::TempDir, name: &str, content: &str) -> SourceLocator {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        SourceLocator::from(path)
    }

    #[test]
    fn test_import_updates_status_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = library_in(&dir);
        let source = source_in(&dir, "book.txt", "once upon a time\n");

        library.import_book(source, "Fairy Tale".to_string());
        assert_eq!(library.import_status(), &ImportStatus::Loading);
        library.wait_idle();

        let book = match library.import_status() {
            ImportStatus::Success(book) => book.clone(),
            other => panic!("unexpected status {:?}", other),
        };
        assert_eq!(library.books(), &[book]);

        library.reset_import_status();
        assert_eq!(library.import_status(), &ImportStatus::Idle);
    }

    #[test]
    fn test_failed_import_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = library_in(&dir);
        let source = source_in(&dir, "empty.txt", "");

        library.import_book(source, "Nothing".to_string());
        library.wait_idle();

        assert!(matches!(library.import_status(), ImportStatus::Error(_)));
        assert!(library.books().is_empty());
    }

    #[test]
    fn test_load_content_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = library_in(&dir);
        library.import_book(source_in(&dir, "a.txt", "alpha\n"), "Alpha".to_string());
        library.wait_idle();

        library.load_book_content("Alpha");
        assert_eq!(
            library.open_book().map(|b| b.content.clone()),
            Some(ContentState::Loading)
        );
        library.wait_idle();
        assert_eq!(
            library.open_book().map(|b| b.content.clone()),
            Some(ContentState::Ready("alpha\n".to_string()))
        );

        assert!(library.remove_book("Alpha").is_some());
        assert!(library.open_book().is_none());
        assert!(library.books().is_empty());

        library.load_book_content("Alpha");
        assert!(matches!(
            library.open_book().map(|b| &b.content),
            Some(ContentState::Failed(_))
        ));
    }

    #[test]
    fn test_stale_content_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = library_in(&dir);
        library.import_book(source_in(&dir, "a.txt", "alpha\n"), "A".to_string());
        library.import_book(source_in(&dir, "b.txt", "beta\n"), "B".to_string());
        library.wait_idle();
        assert_eq!(library.books().len(), 2);

        library.load_book_content("A");
        library.load_book_content("B");
        library.wait_idle();

        let open = library.open_book().unwrap();
        assert_eq!(open.id, "B");
        assert_eq!(open.content, ContentState::Ready("beta\n".to_string()));
    }
}
