//! In-memory mirror of the stored note collection, keyed by front.

use super::entities::StoredNote;
use std::collections::HashMap;

/// Normalize a front before lookup: surrounding whitespace is stripped,
/// everything else must match exactly.
pub fn normalize_front(front: &str) -> &str {
    front.trim()
}

/// Session cache of previously stored notes.
///
/// Populated once at session start from the storage backend and mutated
/// after every insert/overwrite decision. Not durable.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationCache {
    notes: HashMap<String, StoredNote>,
}

impl ReconciliationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from loaded notes. Later duplicates replace earlier
    /// ones; notes with an empty front are dropped.
    pub fn from_notes(notes: impl IntoIterator<Item = StoredNote>) -> Self {
        let mut cache = Self::new();
        for note in notes {
            cache.insert(note);
        }
        cache
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, front: &str) -> bool {
        self.notes.contains_key(normalize_front(front))
    }

    pub fn get(&self, front: &str) -> Option<&StoredNote> {
        self.notes.get(normalize_front(front))
    }

    /// Insert (or replace) a note under its normalized front.
    ///
    /// Returns `false` if the front is empty after normalization.
    pub fn insert(&mut self, mut note: StoredNote) -> bool {
        let key = normalize_front(&note.front).to_string();
        if key.is_empty() {
            return false;
        }
        note.front = key.clone();
        self.notes.insert(key, note);
        true
    }

    /// Replace the back of an existing note. Returns `false` if absent.
    pub fn overwrite_back(&mut self, front: &str, back: impl Into<String>) -> bool {
        match self.notes.get_mut(normalize_front(front)) {
            Some(note) => {
                note.back = back.into();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredNote> {
        self.notes.values()
    }
}
