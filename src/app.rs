//! App Core for the education hub.
//!
//! Central struct holding the catalog snapshot, the filter state and every
//! user-facing store. Hosts (the RPC bridge, the CLI, tests) drive it through
//! plain method calls and pass the current time into the debounced search.

use std::time::Duration;

use tokio::time::Instant;

use crate::database::kv_store::{SharedStorage, BOOKMARKS_KEY, CATALOG_CACHE_KEY, RECENT_SEARCHES_KEY};
use crate::interactions::CatalogInteractions;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::compare_manager::{CompareManager, CompareManagerTrait};
use crate::managers::recent_searches::RecentSearches;
use crate::services::catalog_provider::{CatalogProvider, CatalogSource, CatalogStatus, ConfiguredSource};
use crate::services::category_aggregator::category_facets;
use crate::services::debounce::SearchDebouncer;
use crate::services::search_engine::compute_filtered_programmes;
use crate::types::errors::HubError;
use crate::types::filter::{FilterState, SortKey};
use crate::types::programme::{CategoryFacet, ProgrammeRecord};
use crate::types::settings::HubSettings;

/// Central hub struct holding the catalog and all stores.
///
/// `filters.search_term` is the raw text as typed; results are always
/// computed from the debounced (committed) term.
pub struct EducationHub {
    settings: HubSettings,
    storage: SharedStorage,
    catalog: Vec<ProgrammeRecord>,
    catalog_status: CatalogStatus,
    facets: Vec<CategoryFacet>,
    filters: FilterState,
    debouncer: SearchDebouncer,
    bookmarks: BookmarkManager,
    compare: CompareManager,
    recent: RecentSearches,
    selected: Option<String>,
}

impl EducationHub {
    /// Creates a hub over `storage` and loads the persisted stores.
    ///
    /// Storage failures are absorbed by the stores, so this never fails.
    pub fn new(storage: SharedStorage, settings: &HubSettings) -> Self {
        let mut bookmarks =
            BookmarkManager::new(storage.clone(), settings.storage.key(BOOKMARKS_KEY));
        bookmarks.init();

        let mut recent = RecentSearches::with_capacity(
            storage.clone(),
            settings.storage.key(RECENT_SEARCHES_KEY),
            settings.recent.max_entries,
        );
        recent.init();

        let debouncer = SearchDebouncer::new(
            Duration::from_millis(settings.search.debounce_ms),
            settings.search.min_query_length,
        );

        Self {
            settings: settings.clone(),
            storage,
            catalog: Vec::new(),
            catalog_status: CatalogStatus::default(),
            facets: Vec::new(),
            filters: FilterState::default(),
            debouncer,
            bookmarks,
            compare: CompareManager::with_capacity(settings.compare.max_items),
            recent,
            selected: None,
        }
    }

    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    // ─── Catalog ───

    /// Replaces the catalog snapshot and recomputes the category facets.
    ///
    /// The snapshot counts as freshly loaded. A selection that no longer
    /// exists is dropped. Compare entries keep their snapshots.
    pub fn set_catalog(&mut self, programmes: Vec<ProgrammeRecord>) {
        self.catalog = programmes;
        self.catalog_status = CatalogStatus {
            is_cached: false,
            last_updated: Some(chrono::Utc::now()),
        };
        self.facets = category_facets(&self.catalog);
        if let Some(id) = &self.selected {
            if !self.catalog.iter().any(|p| &p.id == id) {
                self.selected = None;
            }
        }
        tracing::debug!(
            programmes = self.catalog.len(),
            categories = self.facets.len(),
            "catalog replaced"
        );
    }

    /// Refreshes `provider` and adopts its snapshot and cache state.
    pub async fn load_catalog<S: CatalogSource>(
        &mut self,
        provider: &mut CatalogProvider<S>,
        force_bypass_cache: bool,
    ) -> Result<(), HubError> {
        provider.refresh(force_bypass_cache).await?;
        self.set_catalog(provider.programmes().to_vec());
        self.catalog_status = provider.status();
        Ok(())
    }

    /// Fetches straight from `source`, bypassing the storage cache.
    pub async fn load_catalog_from<S: CatalogSource>(&mut self, source: &S) -> Result<(), HubError> {
        let programmes = source.fetch().await?;
        self.set_catalog(programmes);
        Ok(())
    }

    /// Provider for the configured catalog source, caching under the hub's namespace.
    pub fn catalog_provider(&self) -> Result<CatalogProvider<ConfiguredSource>, HubError> {
        let location = self
            .settings
            .catalog
            .source
            .as_deref()
            .ok_or(HubError::NoCatalogSource)?;
        Ok(CatalogProvider::new(
            ConfiguredSource::from_location(location),
            self.storage.clone(),
            self.settings.storage.key(CATALOG_CACHE_KEY),
            chrono::Duration::minutes(self.settings.catalog.cache_ttl_minutes as i64),
        ))
    }

    /// Reloads the configured catalog, serving a fresh cache unless forced.
    pub async fn refresh_catalog(&mut self, force_bypass_cache: bool) -> Result<(), HubError> {
        let mut provider = self.catalog_provider()?;
        self.load_catalog(&mut provider, force_bypass_cache).await
    }

    /// Whether the current snapshot came from cache, and when it was fetched.
    pub fn catalog_status(&self) -> CatalogStatus {
        self.catalog_status
    }

    pub fn catalog(&self) -> &[ProgrammeRecord] {
        &self.catalog
    }

    pub fn programme(&self, id: &str) -> Option<&ProgrammeRecord> {
        self.catalog.iter().find(|p| p.id == id)
    }

    /// Like [`programme`](Self::programme) but reports a missing id as an error.
    pub fn require_programme(&self, id: &str) -> Result<&ProgrammeRecord, HubError> {
        self.programme(id)
            .ok_or_else(|| HubError::UnknownProgramme(id.to_string()))
    }

    /// Category facets, most common first.
    pub fn category_facets(&self) -> &[CategoryFacet] {
        &self.facets
    }

    // ─── Search ───

    /// Records a keystroke; the term is committed by a later [`tick`](Self::tick).
    pub fn set_search_term(&mut self, term: &str, now: Instant) {
        self.filters.search_term = term.to_string();
        self.debouncer.input(term, now);
    }

    /// Commits the pending search term once its quiet period has passed.
    /// Returns true when the committed term changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.debouncer.poll(now).is_some()
    }

    /// Waits out the pending quiet period, if any, and commits.
    pub async fn settle_search(&mut self) -> bool {
        self.debouncer.settle().await.is_some()
    }

    /// True while a search term long enough to filter is waiting to commit.
    pub fn is_searching(&self) -> bool {
        self.debouncer.is_searching()
    }

    pub fn committed_search_term(&self) -> &str {
        self.debouncer.committed_term()
    }

    /// Saves the raw search text to the recent-searches log.
    pub fn submit_search(&mut self) {
        let term = self.filters.search_term.clone();
        self.recent.save_to_recent_searches(&term);
    }

    // ─── Filters ───

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_category(&mut self, category: &str) {
        self.filters.category = category.to_string();
    }

    pub fn set_level(&mut self, level: &str) {
        self.filters.level = level.to_string();
    }

    pub fn set_study_mode(&mut self, study_mode: &str) {
        self.filters.study_mode = study_mode.to_string();
    }

    pub fn set_location(&mut self, location: &str) {
        self.filters.location = location.to_string();
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        self.filters.sort_by = sort_by;
    }

    /// Clears every facet, the sort key and both search terms.
    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.debouncer.reset();
    }

    /// Current results for the committed search term and the active facets.
    pub fn filtered_programmes(&self) -> Vec<&ProgrammeRecord> {
        let committed = self.debouncer.committed_term();
        let search_term = if committed.chars().count() >= self.settings.search.min_query_length {
            committed.to_string()
        } else {
            String::new()
        };
        let effective = FilterState {
            search_term,
            ..self.filters.clone()
        };
        compute_filtered_programmes(&self.catalog, &effective)
    }

    pub fn result_count(&self) -> usize {
        self.filtered_programmes().len()
    }

    // ─── Stores ───

    /// Bookmarked records in catalog order.
    pub fn bookmarked_programmes(&self) -> Vec<&ProgrammeRecord> {
        self.bookmarks.get_bookmarked_programmes(&self.catalog)
    }

    pub fn bookmarks(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    pub fn bookmarks_mut(&mut self) -> &mut BookmarkManager {
        &mut self.bookmarks
    }

    pub fn compare(&self) -> &CompareManager {
        &self.compare
    }

    pub fn compare_mut(&mut self) -> &mut CompareManager {
        &mut self.compare
    }

    /// Adds a catalog programme to the compare list without toggling.
    ///
    /// Returns `Ok(true)` when the programme is in the list afterwards and
    /// `Ok(false)` when the list was already full.
    pub fn add_to_compare(&mut self, id: &str) -> Result<bool, HubError> {
        if self.compare.is_in_compare(id) {
            return Ok(true);
        }
        let record = self.require_programme(id)?.clone();
        Ok(self.compare.add_to_compare(&record))
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn recent_mut(&mut self) -> &mut RecentSearches {
        &mut self.recent
    }

    // ─── Selection ───

    pub fn selected_programme(&self) -> Option<&ProgrammeRecord> {
        self.selected.as_deref().and_then(|id| self.programme(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

impl CatalogInteractions for EducationHub {
    fn on_select(&mut self, id: &str) -> bool {
        if self.programme(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    fn on_bookmark_toggle(&mut self, id: &str) -> bool {
        if self.programme(id).is_none() {
            tracing::debug!(id, "bookmark toggle for unknown programme ignored");
            return false;
        }
        self.bookmarks.toggle_bookmark(id)
    }

    fn on_compare_toggle(&mut self, id: &str) -> bool {
        match self.programme(id).cloned() {
            Some(record) => self.compare.toggle_compare(&record),
            None => {
                // The snapshot may outlive its catalog entry; still let it go.
                self.compare.remove_from_compare(id);
                false
            }
        }
    }
}
