//! Recent searches log.
//!
//! A short most-recent-first list of distinct queries (case-insensitive),
//! persisted as a JSON array of strings on every mutation.

use crate::database::kv_store::SharedStorage;
use crate::types::errors::StorageError;

/// Default number of remembered queries.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Queries shorter than this (after trimming) are not remembered.
pub const MIN_RECENT_LENGTH: usize = 2;

pub struct RecentSearches {
    storage: SharedStorage,
    key: String,
    max_entries: usize,
    entries: Vec<String>,
}

impl RecentSearches {
    pub fn new(storage: SharedStorage, key: impl Into<String>) -> Self {
        Self::with_capacity(storage, key, MAX_RECENT_SEARCHES)
    }

    pub fn with_capacity(storage: SharedStorage, key: impl Into<String>, max_entries: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            max_entries,
            entries: Vec::new(),
        }
    }

    /// Loads the persisted list; corrupt or missing data yields an empty list.
    pub fn init(&mut self) {
        self.entries = self.read().unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "[Recent] Ignoring stored recent searches");
            Vec::new()
        });
        self.entries.truncate(self.max_entries);
    }

    /// Most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves `term` to the front, dropping any case-insensitive duplicate, and persists.
    pub fn save_to_recent_searches(&mut self, term: &str) {
        let term = term.trim();
        if term.chars().count() < MIN_RECENT_LENGTH {
            return;
        }
        let folded = term.to_lowercase();
        self.entries.retain(|existing| existing.to_lowercase() != folded);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(self.max_entries);
        self.persist();
    }

    /// Empties the list and deletes the storage entry.
    pub fn clear_recent_searches(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "[Recent] Failed to remove recent searches");
        }
    }

    fn read(&self) -> Result<Vec<String>, StorageError> {
        match self.storage.get(&self.key)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| StorageError::SerializationError(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(|e| StorageError::SerializationError(e.to_string()))
            .and_then(|json| self.storage.set(&self.key, &json));
        if let Err(e) = result {
            tracing::warn!(key = %self.key, error = %e, "[Recent] Failed to persist recent searches");
        }
    }
}
