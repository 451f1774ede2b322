//! Durable key-value storage abstraction.
//!
//! Mirrors the shape of browser local storage: string keys, string values,
//! synchronous access, finite quota. Stores receive a [`SharedStorage`] so
//! tests can swap in [`MemoryStorage`](super::memory::MemoryStorage).

use std::sync::Arc;

use crate::types::errors::StorageError;

/// Base key for the persisted bookmark list.
pub const BOOKMARKS_KEY: &str = "education-bookmarks";
/// Base key for the persisted recent-searches list.
pub const RECENT_SEARCHES_KEY: &str = "education-recent-searches";
/// Base key for the cached catalog snapshot.
pub const CATALOG_CACHE_KEY: &str = "education-catalog-cache";

/// Trait defining durable key-value storage operations.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage handle shared by every store in a hub.
pub type SharedStorage = Arc<dyn KeyValueStorage>;
