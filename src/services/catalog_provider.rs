// Catalog provider
// Fetches the programme catalog from a source, caches it in durable storage,
// and reports whether the current snapshot came from cache and when it was fetched.

use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::kv_store::SharedStorage;
use crate::types::errors::CatalogError;
use crate::types::programme::ProgrammeRecord;

/// Something that can produce a fresh catalog snapshot.
pub trait CatalogSource {
    /// Short description for logs ("file:/path", "https://...").
    fn describe(&self) -> String;
    fn fetch(&self) -> impl Future<Output = Result<Vec<ProgrammeRecord>, CatalogError>> + Send;
}

/// Parses a catalog payload: either a bare array of programmes or an object
/// with a `programmes` array. Duplicate ids are rejected.
pub fn parse_catalog(json: &str) -> Result<Vec<ProgrammeRecord>, CatalogError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Payload {
        List(Vec<ProgrammeRecord>),
        Wrapped { programmes: Vec<ProgrammeRecord> },
    }

    let programmes = match serde_json::from_str::<Payload>(json) {
        Ok(Payload::List(list)) => list,
        Ok(Payload::Wrapped { programmes }) => programmes,
        Err(e) => return Err(CatalogError::ParseError(e.to_string())),
    };

    let mut seen = HashSet::new();
    for p in &programmes {
        if !seen.insert(p.id.as_str()) {
            return Err(CatalogError::DuplicateId(p.id.clone()));
        }
    }
    Ok(programmes)
}

/// Catalog stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn fetch(&self) -> impl Future<Output = Result<Vec<ProgrammeRecord>, CatalogError>> + Send {
        let path = self.path.clone();
        async move {
            let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                CatalogError::SourceUnavailable(format!("{}: {}", path.display(), e))
            })?;
            parse_catalog(&content)
        }
    }
}

/// Catalog served over HTTP(S) as JSON.
#[cfg(feature = "network")]
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "network")]
impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[cfg(feature = "network")]
impl CatalogSource for HttpCatalogSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> impl Future<Output = Result<Vec<ProgrammeRecord>, CatalogError>> + Send {
        let client = self.client.clone();
        let url = self.url.clone();
        async move {
            let body = client
                .get(&url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| CatalogError::SourceUnavailable(e.to_string()))?
                .text()
                .await
                .map_err(|e| CatalogError::SourceUnavailable(e.to_string()))?;
            parse_catalog(&body)
        }
    }
}

/// Source chosen from a settings string: http(s) URLs go over the network,
/// anything else is treated as a file path.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    File(JsonFileSource),
    #[cfg(feature = "network")]
    Http(HttpCatalogSource),
}

impl ConfiguredSource {
    pub fn from_location(location: &str) -> Self {
        #[cfg(feature = "network")]
        {
            if location.starts_with("http://") || location.starts_with("https://") {
                return ConfiguredSource::Http(HttpCatalogSource::new(location));
            }
        }
        ConfiguredSource::File(JsonFileSource::new(location))
    }
}

impl CatalogSource for ConfiguredSource {
    fn describe(&self) -> String {
        match self {
            ConfiguredSource::File(s) => s.describe(),
            #[cfg(feature = "network")]
            ConfiguredSource::Http(s) => s.describe(),
        }
    }

    fn fetch(&self) -> impl Future<Output = Result<Vec<ProgrammeRecord>, CatalogError>> + Send {
        let this = self.clone();
        async move {
            match this {
                ConfiguredSource::File(s) => s.fetch().await,
                #[cfg(feature = "network")]
                ConfiguredSource::Http(s) => s.fetch().await,
            }
        }
    }
}

/// Cache envelope written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedCatalog {
    fetched_at: DateTime<Utc>,
    programmes: Vec<ProgrammeRecord>,
}

/// Where the current snapshot came from, as reported to hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    pub is_cached: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Holds the current catalog snapshot and its provenance.
pub struct CatalogProvider<S: CatalogSource> {
    source: S,
    storage: SharedStorage,
    cache_key: String,
    ttl: chrono::Duration,
    programmes: Vec<ProgrammeRecord>,
    is_cached: bool,
    last_updated: Option<DateTime<Utc>>,
}

impl<S: CatalogSource> CatalogProvider<S> {
    pub fn new(source: S, storage: SharedStorage, cache_key: impl Into<String>, ttl: chrono::Duration) -> Self {
        Self {
            source,
            storage,
            cache_key: cache_key.into(),
            ttl,
            programmes: Vec::new(),
            is_cached: false,
            last_updated: None,
        }
    }

    pub fn programmes(&self) -> &[ProgrammeRecord] {
        &self.programmes
    }

    /// True when the current snapshot was served from the storage cache.
    pub fn is_cached(&self) -> bool {
        self.is_cached
    }

    /// When the current snapshot was fetched from its source.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn status(&self) -> CatalogStatus {
        CatalogStatus {
            is_cached: self.is_cached,
            last_updated: self.last_updated,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Updates the snapshot.
    ///
    /// Without `force_bypass_cache` a cache entry younger than the TTL is used
    /// as-is. A failed fetch falls back to any cache entry regardless of age;
    /// the error is only returned when there is nothing cached.
    pub async fn refresh(&mut self, force_bypass_cache: bool) -> Result<(), CatalogError> {
        let cached = self.read_cache();

        let fresh = cached
            .as_ref()
            .is_some_and(|entry| Utc::now() - entry.fetched_at < self.ttl);
        if fresh && !force_bypass_cache {
            tracing::debug!(source = %self.source.describe(), "[Catalog] Serving fresh cache");
            self.apply_cache(cached);
            return Ok(());
        }

        match self.source.fetch().await {
            Ok(programmes) => {
                let now = Utc::now();
                self.write_cache(now, &programmes);
                tracing::info!(
                    source = %self.source.describe(),
                    count = programmes.len(),
                    "[Catalog] Fetched catalog"
                );
                self.programmes = programmes;
                self.is_cached = false;
                self.last_updated = Some(now);
                Ok(())
            }
            Err(e) if cached.is_some() => {
                tracing::warn!(
                    source = %self.source.describe(),
                    error = %e,
                    "[Catalog] Fetch failed; serving cached catalog"
                );
                self.apply_cache(cached);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn apply_cache(&mut self, cached: Option<CachedCatalog>) {
        if let Some(entry) = cached {
            self.programmes = entry.programmes;
            self.is_cached = true;
            self.last_updated = Some(entry.fetched_at);
        }
    }

    fn read_cache(&self) -> Option<CachedCatalog> {
        match self.storage.get(&self.cache_key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(key = %self.cache_key, error = %e, "[Catalog] Ignoring malformed cache");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %self.cache_key, error = %e, "[Catalog] Failed to read cache");
                None
            }
        }
    }

    fn write_cache(&self, fetched_at: DateTime<Utc>, programmes: &[ProgrammeRecord]) {
        let entry = CachedCatalog {
            fetched_at,
            programmes: programmes.to_vec(),
        };
        let result = serde_json::to_string(&entry)
            .map_err(|e| e.to_string())
            .and_then(|json| self.storage.set(&self.cache_key, &json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            tracing::warn!(key = %self.cache_key, error = %e, "[Catalog] Failed to write cache");
        }
    }
}
