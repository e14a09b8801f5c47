use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use ingestion_logging::{ingest_debug, ingest_warn};

/// What a drop gesture delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    FileList(Vec<PathBuf>),
    /// Anything that is not a list of files (text, URLs, images...).
    Unsupported { format: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub previous: Option<PathBuf>,
    pub current: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&SelectionChanged) + Send>;

/// Single-value store for the chosen input path.
///
/// Each `set` replaces the previous value and notifies every observer in
/// subscription order. No history is kept.
#[derive(Default)]
pub struct SelectionHolder {
    current: Option<PathBuf>,
    observers: BTreeMap<SubscriptionId, Observer>,
    next_id: u64,
}

impl SelectionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&PathBuf> {
        self.current.as_ref()
    }

    pub fn set(&mut self, path: impl Into<PathBuf>) {
        let current = path.into();
        let previous = self.current.replace(current.clone());
        let event = SelectionChanged { previous, current };
        for observer in self.observers.values_mut() {
            observer(&event);
        }
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&SelectionChanged) + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.observers.insert(id, Box::new(observer));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id).is_some()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Applies a drop. Only the first path of a file list is kept; the rest
    /// are discarded. Unsupported payloads and empty lists leave the
    /// selection untouched and return `false`.
    pub fn accept_drop(&mut self, payload: DropPayload) -> bool {
        match payload {
            DropPayload::FileList(paths) => {
                let dropped = paths.len();
                let Some(first) = paths.into_iter().next() else {
                    ingest_warn!("Ignoring drop with an empty file list");
                    return false;
                };
                if dropped > 1 {
                    ingest_debug!("Drop carried {} paths; keeping only the first", dropped);
                }
                self.set(first);
                true
            }
            DropPayload::Unsupported { format } => {
                ingest_warn!("Ignoring drop of unsupported format {}", format);
                false
            }
        }
    }
}

impl fmt::Debug for SelectionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionHolder")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}
