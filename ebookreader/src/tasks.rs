//! Background import and read tasks
//!
//! One thread per request. Outcomes come back over a channel and are
//! drained by the owner of the book list, which applies them.

use crate::book::{Book, Result};
use crate::source::SourceLocator;
use crate::store::Shelf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::debug;

pub enum TaskOutcome {
    Imported { title: String, result: Result<Book> },
    Loaded { id: String, result: Result<String> },
}

/// Called from the worker thread after an outcome is sent
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

pub struct TaskRunner {
    tx: Sender<TaskOutcome>,
    rx: Receiver<TaskOutcome>,
    pending: usize,
    notifier: Option<Notifier>,
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRunner {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            pending: 0,
            notifier: None,
        }
    }

    pub fn set_notifier(&mut self, notifier: Notifier) {
        self.notifier = Some(notifier);
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    pub fn import(&mut self, shelf: &Shelf, source: SourceLocator, title: String) {
        let shelf = shelf.clone();
        self.spawn(move || {
            let result = shelf.import(&source, &title);
            TaskOutcome::Imported { title, result }
        });
    }

    pub fn load(&mut self, shelf: &Shelf, book: Book) {
        let shelf = shelf.clone();
        self.spawn(move || {
            let result = shelf.read(&book);
            TaskOutcome::Loaded {
                id: book.id,
                result,
            }
        });
    }

    /// Outcomes that have arrived so far, without blocking
    pub fn poll(&mut self) -> Vec<TaskOutcome> {
        let outcomes: Vec<TaskOutcome> = self.rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(outcomes.len());
        outcomes
    }

    /// Block for the next outcome. `None` once nothing is pending.
    pub fn wait(&mut self) -> Option<TaskOutcome> {
        if self.pending == 0 {
            return None;
        }
        let outcome = self.rx.recv().ok()?;
        self.pending -= 1;
        Some(outcome)
    }

    fn spawn(&mut self, task: impl FnOnce() -> TaskOutcome + Send + 'static) {
        let tx = self.tx.clone();
        let notifier = self.notifier.clone();
        self.pending += 1;
        thread::spawn(move || {
            let outcome = task();
            if tx.send(outcome).is_err() {
                debug!("task finished after its runner was dropped");
                return;
            }
            if let Some(notify) = notifier {
                notify();
            }
        });
    }
}
