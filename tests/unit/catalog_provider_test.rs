//! Tests for catalog loading: parsing, the storage cache and fallback on
//! source failure.

use std::sync::Arc;

use coursefinder::database::{KeyValueStorage, MemoryStorage};
use coursefinder::services::catalog_provider::{CatalogProvider, ConfiguredSource, JsonFileSource};
use coursefinder::types::errors::CatalogError;
use serde_json::json;
use tempfile::TempDir;

const CACHE_KEY: &str = "education-catalog-cache";

fn catalog_json(ids: &[&str]) -> String {
    let programmes: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Programme {}", id),
                "institution": "Valley College",
                "category": "Certificate",
                "level": "Level 2",
                "studyMode": "Part-time",
            })
        })
        .collect();
    serde_json::to_string(&programmes).unwrap()
}

fn write_catalog(dir: &TempDir, ids: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, catalog_json(ids)).unwrap();
    path
}

fn provider(
    path: &std::path::Path,
    storage: &Arc<MemoryStorage>,
    ttl_minutes: i64,
) -> CatalogProvider<JsonFileSource> {
    CatalogProvider::new(
        JsonFileSource::new(path),
        storage.clone(),
        CACHE_KEY,
        chrono::Duration::minutes(ttl_minutes),
    )
}

#[tokio::test]
async fn test_first_load_fetches_and_writes_cache() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, &["a", "b"]);
    let storage = Arc::new(MemoryStorage::new());

    let mut p = provider(&path, &storage, 60);
    p.refresh(false).await.unwrap();

    assert_eq!(p.programmes().len(), 2);
    assert!(!p.is_cached());
    assert!(p.last_updated().is_some());

    let cached: serde_json::Value = serde_json::from_str(&storage.raw(CACHE_KEY).unwrap()).unwrap();
    assert!(cached["fetchedAt"].is_string());
    assert_eq!(cached["programmes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_fresh_cache_is_served_without_fetch() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, &["a", "b"]);
    let storage = Arc::new(MemoryStorage::new());

    provider(&path, &storage, 60).refresh(false).await.unwrap();
    // The source changes, but the cache is still fresh.
    write_catalog(&dir, &["a", "b", "c"]);

    let mut p = provider(&path, &storage, 60);
    p.refresh(false).await.unwrap();
    assert!(p.is_cached());
    assert_eq!(p.programmes().len(), 2);

    p.refresh(true).await.unwrap();
    assert!(!p.is_cached());
    assert_eq!(p.programmes().len(), 3);
}

#[tokio::test]
async fn test_expired_cache_refetches() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, &["a"]);
    let storage = Arc::new(MemoryStorage::new());

    provider(&path, &storage, 60).refresh(false).await.unwrap();
    write_catalog(&dir, &["a", "b"]);

    let mut p = provider(&path, &storage, 0);
    p.refresh(false).await.unwrap();
    assert!(!p.is_cached());
    assert_eq!(p.programmes().len(), 2);
}

#[tokio::test]
async fn test_source_failure_falls_back_to_stale_cache() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, &["a", "b"]);
    let storage = Arc::new(MemoryStorage::new());

    provider(&path, &storage, 60).refresh(false).await.unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut p = provider(&path, &storage, 0);
    p.refresh(false).await.unwrap();
    assert!(p.is_cached());
    assert_eq!(p.programmes().len(), 2);
}

#[tokio::test]
async fn test_source_failure_without_cache_is_an_error() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(MemoryStorage::new());

    let mut p = provider(&dir.path().join("missing.json"), &storage, 60);
    let err = p.refresh(false).await.unwrap_err();
    assert!(matches!(err, CatalogError::SourceUnavailable(_)));
    assert!(p.programmes().is_empty());
    assert!(p.last_updated().is_none());
}

#[tokio::test]
async fn test_malformed_cache_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, &["a"]);
    let storage = Arc::new(MemoryStorage::new());
    storage.set(CACHE_KEY, "garbage").unwrap();

    let mut p = provider(&path, &storage, 60);
    p.refresh(false).await.unwrap();
    assert!(!p.is_cached());
    assert_eq!(p.programmes().len(), 1);
}

#[tokio::test]
async fn test_cache_write_failure_is_absorbed() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, &["a"]);
    let storage = Arc::new(MemoryStorage::new());
    storage.set_fail_writes(true);

    let mut p = provider(&path, &storage, 60);
    p.refresh(false).await.unwrap();
    assert_eq!(p.programmes().len(), 1);
    assert!(!storage.contains_key(CACHE_KEY));
}

#[tokio::test]
async fn test_duplicate_ids_in_source_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, &["a", "a"]);
    let storage = Arc::new(MemoryStorage::new());

    let mut p = provider(&path, &storage, 60);
    assert!(matches!(p.refresh(false).await, Err(CatalogError::DuplicateId(_))));
}

#[tokio::test]
async fn test_configured_source_reads_files() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog(&dir, &["x", "y", "z"]);
    let storage = Arc::new(MemoryStorage::new());

    let mut p = CatalogProvider::new(
        ConfiguredSource::from_location(&path.to_string_lossy()),
        storage,
        CACHE_KEY,
        chrono::Duration::minutes(5),
    );
    p.refresh(false).await.unwrap();
    assert_eq!(p.programmes().len(), 3);
}
