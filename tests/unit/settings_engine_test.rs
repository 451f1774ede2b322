//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, value persistence, validation and reset behavior.

use coursefinder::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use coursefinder::types::errors::SettingsError;
use coursefinder::types::settings::HubSettings;
use serde_json::json;
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, HubSettings::default());
    assert!(!dir.path().join("settings.json").exists(), "load must not create the file");
}

#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine.set_value("search.debounce_ms", json!(150)).unwrap();
        engine.set_value("storage.namespace", json!("tenant-a:")).unwrap();
    }

    let mut engine = engine_in_temp(&dir);
    let settings = engine.load().unwrap();
    assert_eq!(settings.search.debounce_ms, 150);
    assert_eq!(settings.storage.namespace, "tenant-a:");
    assert_eq!(settings.storage.key("education-bookmarks"), "tenant-a:education-bookmarks");
}

#[test]
fn test_set_value_accepts_optional_fields() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    engine.set_value("catalog.source", json!("https://example.org/catalog.json")).unwrap();
    assert_eq!(
        engine.get_settings().catalog.source.as_deref(),
        Some("https://example.org/catalog.json")
    );

    engine.set_value("catalog.source", serde_json::Value::Null).unwrap();
    assert!(engine.get_settings().catalog.source.is_none());
}

#[test]
fn test_unknown_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    assert!(matches!(
        engine.set_value("search.nope", json!(1)),
        Err(SettingsError::InvalidKey(_))
    ));
    assert!(matches!(
        engine.set_value("nope.debounce_ms", json!(1)),
        Err(SettingsError::InvalidKey(_))
    ));
    assert!(matches!(
        engine.set_value("search.debounce_ms.deeper", json!(1)),
        Err(SettingsError::InvalidKey(_))
    ));
    assert!(matches!(engine.set_value("", json!(1)), Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_wrong_type_is_rejected_and_state_kept() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    assert!(matches!(
        engine.set_value("search.debounce_ms", json!("fast")),
        Err(SettingsError::InvalidValue(_))
    ));
    assert_eq!(engine.get_settings().search.debounce_ms, 300);
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    assert!(engine.set_value("compare.max_items", json!(1)).is_err());
    assert!(engine.set_value("recent.max_entries", json!(0)).is_err());
    assert_eq!(engine.get_settings().compare.max_items, 3);

    engine.set_value("compare.max_items", json!(4)).unwrap();
    assert_eq!(engine.get_settings().compare.max_items, 4);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"search":{"debounce_ms":500}}"#,
    )
    .unwrap();

    let mut engine = engine_in_temp(&dir);
    let settings = engine.load().unwrap();
    assert_eq!(settings.search.debounce_ms, 500);
    assert_eq!(settings.search.min_query_length, 2);
    assert_eq!(settings.recent.max_entries, 5);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

    let mut engine = engine_in_temp(&dir);
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine.set_value("search.min_query_length", json!(3)).unwrap();

    engine.reset().unwrap();
    assert_eq!(engine.get_settings(), &HubSettings::default());

    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), HubSettings::default());
}

#[test]
fn test_config_path_override() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in_temp(&dir);
    assert!(engine.get_config_path().ends_with("settings.json"));
    assert!(engine
        .get_config_path()
        .starts_with(dir.path().to_string_lossy().as_ref()));
}
