use serde::{Deserialize, Serialize};

/// Top-level education hub settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct HubSettings {
    pub search: SearchSettings,
    pub compare: CompareSettings,
    pub recent: RecentSettings,
    pub storage: StorageSettings,
    pub catalog: CatalogSettings,
}

/// Search input behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period before a typed term is committed.
    pub debounce_ms: u64,
    /// Terms shorter than this never filter the catalog.
    pub min_query_length: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_length: 2,
        }
    }
}

/// Compare list capacity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompareSettings {
    pub max_items: usize,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            max_items: crate::managers::compare_manager::MAX_COMPARE_ITEMS,
        }
    }
}

/// Recent-searches capacity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecentSettings {
    pub max_entries: usize,
}

impl Default for RecentSettings {
    fn default() -> Self {
        Self {
            max_entries: crate::managers::recent_searches::MAX_RECENT_SEARCHES,
        }
    }
}

/// Where persisted state lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorageSettings {
    /// Prefix prepended to every storage key.
    pub namespace: String,
    /// SQLite file; the platform data directory is used when unset.
    pub database_path: Option<String>,
}

impl StorageSettings {
    /// Builds the full storage key for `base`.
    pub fn key(&self, base: &str) -> String {
        format!("{}{}", self.namespace, base)
    }
}

/// Catalog source and cache policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogSettings {
    /// JSON file path or http(s) URL.
    pub source: Option<String>,
    pub cache_ttl_minutes: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source: None,
            cache_ttl_minutes: 60,
        }
    }
}
