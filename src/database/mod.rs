//! Durable storage layer.
//!
//! Provides the [`KeyValueStorage`] abstraction, its SQLite implementation
//! ([`Database`]) with schema migrations, and an in-memory fake.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use coursefinder::database::{Database, KeyValueStorage, SharedStorage};
//!
//! let db = Database::open("coursefinder.db").expect("failed to open database");
//! db.set("greeting", "hello").expect("write failed");
//!
//! let shared: SharedStorage = Arc::new(db);
//! ```

pub mod connection;
pub mod kv_store;
pub mod memory;
pub mod migrations;

pub use connection::Database;
pub use kv_store::{KeyValueStorage, SharedStorage};
pub use memory::MemoryStorage;

use std::path::PathBuf;
use std::sync::Arc;

use crate::platform;
use crate::types::settings::StorageSettings;

/// SQLite path from settings, or the platform default.
pub fn configured_database_path(settings: &StorageSettings) -> PathBuf {
    settings
        .database_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(platform::default_database_path)
}

/// Opens the configured SQLite store.
///
/// When the file cannot be opened the hub still runs: the failure is logged
/// and an in-memory store is returned, so nothing persists for this session.
pub fn open_shared(settings: &StorageSettings) -> SharedStorage {
    let path = configured_database_path(settings);
    match Database::open(&path) {
        Ok(db) => {
            tracing::debug!(path = %path.display(), "storage opened");
            Arc::new(db)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "[Storage] Falling back to in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    }
}
