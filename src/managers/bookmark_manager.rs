//! Bookmark store for the education hub.
//!
//! Implements `BookmarkManagerTrait`: a set of programme ids persisted to
//! durable key-value storage as a JSON array of `{ id, savedAt }` objects.
//!
//! Persistence is fail-soft: storage errors are logged and absorbed, and the
//! in-memory set stays authoritative for the rest of the session.

use serde::{Deserialize, Serialize};

use crate::database::kv_store::SharedStorage;
use crate::types::errors::StorageError;
use crate::types::programme::ProgrammeRecord;

/// Trait defining bookmark management operations.
pub trait BookmarkManagerTrait {
    fn is_bookmarked(&self, id: &str) -> bool;
    fn toggle_bookmark(&mut self, id: &str) -> bool;
    fn add_bookmark(&mut self, id: &str);
    fn remove_bookmark(&mut self, id: &str);
    fn clear_all_bookmarks(&mut self);
    fn get_bookmarked_programmes<'a>(&self, catalog: &'a [ProgrammeRecord]) -> Vec<&'a ProgrammeRecord>;
}

/// One persisted bookmark, exactly as written to storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedBookmark {
    pub id: String,
    pub saved_at: String,
}

/// Accepted on load: the current object form, or a bare id list from older builds.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBookmarks {
    Entries(Vec<SavedBookmark>),
    Ids(Vec<String>),
}

/// Bookmark store backed by a shared key-value storage handle.
pub struct BookmarkManager {
    storage: SharedStorage,
    key: String,
    entries: Vec<SavedBookmark>,
}

impl BookmarkManager {
    /// Creates an empty store writing under `key`. Call [`init`](Self::init) to load.
    pub fn new(storage: SharedStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            entries: Vec::new(),
        }
    }

    /// Loads the persisted set. Missing or unreadable data yields an empty set.
    pub fn init(&mut self) {
        self.entries = self.read().unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "[Bookmarks] Ignoring stored bookmarks");
            Vec::new()
        });
        self.dedup();
        tracing::debug!(key = %self.key, count = self.entries.len(), "[Bookmarks] Loaded");
    }

    /// Bookmarked ids in the order they were saved.
    pub fn bookmarked_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn entries(&self) -> &[SavedBookmark] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// ISO-8601 UTC timestamp with millisecond precision ("2024-05-01T09:30:00.000Z").
    fn now() -> String {
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }

    fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.entries.retain(|e| seen.insert(e.id.clone()));
    }

    fn read(&self) -> Result<Vec<SavedBookmark>, StorageError> {
        let Some(json) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let stored = serde_json::from_str::<StoredBookmarks>(&json)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(match stored {
            StoredBookmarks::Entries(entries) => entries,
            StoredBookmarks::Ids(ids) => {
                let now = Self::now();
                ids.into_iter()
                    .map(|id| SavedBookmark { id, saved_at: now.clone() })
                    .collect()
            }
        })
    }

    fn write(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.storage.set(&self.key, &json)
    }

    fn persist(&self) {
        match self.write() {
            Ok(()) => tracing::debug!(
                key = %self.key,
                count = self.entries.len(),
                "[Bookmarks] Persisted"
            ),
            Err(e) => tracing::warn!(key = %self.key, error = %e, "[Bookmarks] Failed to persist bookmarks"),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    fn is_bookmarked(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Adds the id if absent, removes it if present. Returns the new membership.
    fn toggle_bookmark(&mut self, id: &str) -> bool {
        let bookmarked = match self.position(id) {
            Some(i) => {
                self.entries.remove(i);
                false
            }
            None => {
                self.entries.push(SavedBookmark {
                    id: id.to_string(),
                    saved_at: Self::now(),
                });
                true
            }
        };
        self.persist();
        bookmarked
    }

    fn add_bookmark(&mut self, id: &str) {
        if self.is_bookmarked(id) {
            return;
        }
        self.entries.push(SavedBookmark {
            id: id.to_string(),
            saved_at: Self::now(),
        });
        self.persist();
    }

    fn remove_bookmark(&mut self, id: &str) {
        if let Some(i) = self.position(id) {
            self.entries.remove(i);
            self.persist();
        }
    }

    /// Empties the set and deletes the storage entry instead of writing `[]`.
    fn clear_all_bookmarks(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "[Bookmarks] Failed to remove bookmarks");
        }
    }

    /// Bookmarked records in catalog order. Ids not in the catalog are skipped.
    fn get_bookmarked_programmes<'a>(&self, catalog: &'a [ProgrammeRecord]) -> Vec<&'a ProgrammeRecord> {
        catalog.iter().filter(|p| self.is_bookmarked(&p.id)).collect()
    }
}
