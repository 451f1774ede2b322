//! Unit tests for the recent-searches log.

use std::sync::Arc;

use coursefinder::database::{KeyValueStorage, MemoryStorage};
use coursefinder::managers::recent_searches::{RecentSearches, MAX_RECENT_SEARCHES};

const KEY: &str = "education-recent-searches";

fn recent(storage: &Arc<MemoryStorage>) -> RecentSearches {
    let mut log = RecentSearches::new(storage.clone(), KEY);
    log.init();
    log
}

#[test]
fn test_case_insensitive_dedup_moves_to_front() {
    let storage = Arc::new(MemoryStorage::new());
    let mut log = recent(&storage);

    log.save_to_recent_searches("Electrical");
    log.save_to_recent_searches("Plumbing");
    log.save_to_recent_searches("electrical");

    assert_eq!(log.entries(), ["electrical", "Plumbing"]);
}

#[test]
fn test_keeps_five_most_recent() {
    let storage = Arc::new(MemoryStorage::new());
    let mut log = recent(&storage);

    for term in ["one", "two", "three", "four", "five", "six"] {
        log.save_to_recent_searches(term);
    }
    assert_eq!(log.len(), MAX_RECENT_SEARCHES);
    assert_eq!(log.entries(), ["six", "five", "four", "three", "two"]);
}

#[test]
fn test_short_and_blank_terms_are_ignored() {
    let storage = Arc::new(MemoryStorage::new());
    let mut log = recent(&storage);

    log.save_to_recent_searches("");
    log.save_to_recent_searches("   ");
    log.save_to_recent_searches(" a ");
    assert!(log.is_empty());
    assert_eq!(storage.write_count(), 0);

    log.save_to_recent_searches("  solar  ");
    assert_eq!(log.entries(), ["solar"]);
}

#[test]
fn test_persisted_as_string_array() {
    let storage = Arc::new(MemoryStorage::new());
    let mut log = recent(&storage);
    log.save_to_recent_searches("welding");
    log.save_to_recent_searches("carpentry");

    assert_eq!(storage.raw(KEY).as_deref(), Some(r#"["carpentry","welding"]"#));
}

#[test]
fn test_survives_new_instance() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let mut log = recent(&storage);
        log.save_to_recent_searches("hairdressing");
    }
    let log = recent(&storage);
    assert_eq!(log.entries(), ["hairdressing"]);
}

#[test]
fn test_clear_removes_key() {
    let storage = Arc::new(MemoryStorage::new());
    let mut log = recent(&storage);
    log.save_to_recent_searches("plastering");

    log.clear_recent_searches();
    assert!(log.is_empty());
    assert!(!storage.contains_key(KEY));
}

#[test]
fn test_oversized_stored_list_is_truncated() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(KEY, r#"["a1","b2","c3","d4","e5","f6","g7"]"#).unwrap();

    let log = recent(&storage);
    assert_eq!(log.entries(), ["a1", "b2", "c3", "d4", "e5"]);
}

#[test]
fn test_custom_capacity() {
    let storage = Arc::new(MemoryStorage::new());
    let mut log = RecentSearches::with_capacity(storage, KEY, 2);
    log.init();
    for term in ["aa", "bb", "cc"] {
        log.save_to_recent_searches(term);
    }
    assert_eq!(log.entries(), ["cc", "bb"]);
}

#[test]
fn test_fail_soft_storage() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(KEY, "not json").unwrap();
    let mut log = recent(&storage);
    assert!(log.is_empty());

    storage.set_fail_writes(true);
    log.save_to_recent_searches("masonry");
    assert_eq!(log.entries(), ["masonry"]);
    assert_eq!(storage.raw(KEY).as_deref(), Some("not json"));
}
