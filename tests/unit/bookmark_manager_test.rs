//! Unit tests for the BookmarkManager: membership, persistence shape,
//! reload across instances and fail-soft behaviour.

use std::sync::Arc;

use coursefinder::database::{Database, KeyValueStorage, MemoryStorage};
use coursefinder::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait, SavedBookmark};
use coursefinder::types::programme::ProgrammeRecord;
use serde_json::json;

const KEY: &str = "education-bookmarks";

fn programme(id: &str) -> ProgrammeRecord {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Programme {}", id),
        "institution": "Riverside Institute",
        "category": "Degree",
        "level": "Level 6",
        "studyMode": "Full-time",
    }))
    .unwrap()
}

fn manager(storage: &Arc<MemoryStorage>) -> BookmarkManager {
    let mut mgr = BookmarkManager::new(storage.clone(), KEY);
    mgr.init();
    mgr
}

#[test]
fn test_toggle_round_trip() {
    let storage = Arc::new(MemoryStorage::new());
    let mut mgr = manager(&storage);

    assert!(!mgr.is_bookmarked("p1"));
    assert!(mgr.toggle_bookmark("p1"));
    assert!(mgr.is_bookmarked("p1"));
    assert!(!mgr.toggle_bookmark("p1"));
    assert!(!mgr.is_bookmarked("p1"));

    let catalog = vec![programme("p1"), programme("p2")];
    assert!(mgr.get_bookmarked_programmes(&catalog).is_empty());
}

#[test]
fn test_persisted_shape_is_id_and_saved_at() {
    let storage = Arc::new(MemoryStorage::new());
    let mut mgr = manager(&storage);
    mgr.add_bookmark("p1");
    mgr.add_bookmark("p2");

    let raw = storage.raw(KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], "p1");
    assert!(entries[0]["savedAt"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_bookmarks_survive_new_instance() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let mut mgr = manager(&storage);
        mgr.toggle_bookmark("p2");
        mgr.toggle_bookmark("p3");
    }

    let mgr = manager(&storage);
    assert!(mgr.is_bookmarked("p2"));
    assert!(mgr.is_bookmarked("p3"));
    assert_eq!(mgr.count(), 2);
}

#[test]
fn test_existing_saved_at_is_preserved() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .set(KEY, r#"[{"id":"old","savedAt":"2023-02-01T10:00:00.000Z"}]"#)
        .unwrap();

    let mut mgr = manager(&storage);
    mgr.add_bookmark("new");

    let stored: Vec<SavedBookmark> = serde_json::from_str(&storage.raw(KEY).unwrap()).unwrap();
    assert_eq!(stored[0].id, "old");
    assert_eq!(stored[0].saved_at, "2023-02-01T10:00:00.000Z");
    assert_eq!(stored[1].id, "new");
}

#[test]
fn test_add_and_remove_are_idempotent() {
    let storage = Arc::new(MemoryStorage::new());
    let mut mgr = manager(&storage);

    mgr.add_bookmark("p1");
    let writes = storage.write_count();
    mgr.add_bookmark("p1");
    assert_eq!(mgr.count(), 1);
    assert_eq!(storage.write_count(), writes, "re-adding must not rewrite storage");

    mgr.remove_bookmark("p1");
    mgr.remove_bookmark("p1");
    assert_eq!(mgr.count(), 0);
}

#[test]
fn test_clear_removes_storage_key() {
    let storage = Arc::new(MemoryStorage::new());
    let mut mgr = manager(&storage);
    mgr.add_bookmark("p1");
    assert!(storage.contains_key(KEY));

    mgr.clear_all_bookmarks();
    assert_eq!(mgr.count(), 0);
    assert!(!storage.contains_key(KEY));
}

#[test]
fn test_bookmarked_programmes_follow_catalog_order() {
    let storage = Arc::new(MemoryStorage::new());
    let mut mgr = manager(&storage);
    mgr.add_bookmark("c");
    mgr.add_bookmark("a");
    mgr.add_bookmark("gone");

    let catalog = vec![programme("a"), programme("b"), programme("c")];
    let ids: Vec<&str> = mgr
        .get_bookmarked_programmes(&catalog)
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn test_corrupt_storage_loads_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(KEY, "{{{ not json").unwrap();

    let mgr = manager(&storage);
    assert_eq!(mgr.count(), 0);
}

#[test]
fn test_read_failure_loads_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(KEY, r#"[{"id":"p1","savedAt":"2024-01-01T00:00:00.000Z"}]"#).unwrap();
    storage.set_fail_reads(true);

    let mgr = manager(&storage);
    assert!(!mgr.is_bookmarked("p1"));
}

#[test]
fn test_write_failure_keeps_memory_state() {
    let storage = Arc::new(MemoryStorage::new());
    let mut mgr = manager(&storage);
    storage.set_fail_writes(true);

    assert!(mgr.toggle_bookmark("p1"));
    assert!(mgr.is_bookmarked("p1"));
    assert!(!storage.contains_key(KEY));

    mgr.clear_all_bookmarks();
    assert_eq!(mgr.count(), 0);
}

#[test]
fn test_namespaced_key_on_sqlite() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let key = "school-a:education-bookmarks";
    {
        let mut mgr = BookmarkManager::new(db.clone(), key);
        mgr.init();
        mgr.add_bookmark("p9");
    }
    assert!(db.get(key).unwrap().is_some());
    assert!(db.get(KEY).unwrap().is_none());

    let mut mgr = BookmarkManager::new(db, key);
    mgr.init();
    assert_eq!(mgr.bookmarked_ids(), vec!["p9"]);
}
