// Education hub services
// Services provide the catalog engine: search/filter/sort, facets, debouncing, catalog loading, settings.

pub mod catalog_provider;
pub mod category_aggregator;
pub mod debounce;
pub mod search_engine;
pub mod settings_engine;
