//! Coursefinder: the catalog engine behind an education-hub page.
//!
//! Search, facet filtering and sorting over a programme catalog, plus the
//! user's bookmarks, compare list and recent searches persisted to durable
//! key-value storage. This library crate exposes all modules for use by the
//! binaries and integration tests.

pub mod app;
pub mod database;
pub mod interactions;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
