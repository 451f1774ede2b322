//! RPC method handler for the education hub JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! hub's catalog, filters and stores via the `EducationHub` struct.

use std::future::Future;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::app::EducationHub;
use crate::interactions::CatalogInteractions;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::managers::compare_manager::CompareManagerTrait;
use crate::services::catalog_provider::{parse_catalog, JsonFileSource};
use crate::types::filter::SortKey;
use crate::types::programme::ProgrammeRecord;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn programme_list(records: &[&ProgrammeRecord]) -> Result<Value, String> {
    to_json(records)
}

/// Runs an async hub operation to completion. Must not be called from
/// inside a tokio runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;
    Ok(runtime.block_on(future))
}

fn catalog_status(hub: &EducationHub) -> Value {
    let status = hub.catalog_status();
    json!({
        "count": hub.catalog().len(),
        "isCached": status.is_cached,
        "lastUpdated": status.last_updated.map(|t| t.to_rfc3339()),
    })
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(hub: &Mutex<EducationHub>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Catalog ───
        "catalog.load" => {
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            if let Some(list) = params.get("programmes") {
                let programmes = parse_catalog(&list.to_string()).map_err(|e| e.to_string())?;
                h.set_catalog(programmes);
            } else {
                let source = JsonFileSource::new(str_param(params, "path")?);
                block_on(h.load_catalog_from(&source))?.map_err(|e| e.to_string())?;
            }
            Ok(json!({"count": h.catalog().len(), "categories": h.category_facets().len()}))
        }
        "catalog.refresh" => {
            let force = params.get("force").and_then(|v| v.as_bool()).unwrap_or(false);
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            block_on(h.refresh_catalog(force))?.map_err(|e| e.to_string())?;
            Ok(catalog_status(&h))
        }
        "catalog.status" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            Ok(catalog_status(&h))
        }
        "catalog.categories" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            to_json(h.category_facets())
        }

        // ─── Search ───
        "search.input" => {
            let term = str_param(params, "term")?;
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.set_search_term(term, Instant::now());
            Ok(json!({"searching": h.is_searching()}))
        }
        "search.tick" => {
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            let committed = h.tick(Instant::now());
            Ok(json!({
                "committed": committed,
                "term": h.committed_search_term(),
                "searching": h.is_searching(),
            }))
        }
        "search.submit" => {
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.submit_search();
            to_json(h.recent().entries())
        }
        "search.results" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            let results = h.filtered_programmes();
            Ok(json!({
                "count": results.len(),
                "programmes": programme_list(&results)?,
            }))
        }

        // ─── Filters ───
        "filters.get" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            to_json(h.filters())
        }
        "filters.set" => {
            let sort_by = match params.get("sortBy").and_then(|v| v.as_str()) {
                Some(raw) => Some(raw.parse::<SortKey>()?),
                None => None,
            };
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            if let Some(v) = params.get("category").and_then(|v| v.as_str()) {
                h.set_category(v);
            }
            if let Some(v) = params.get("level").and_then(|v| v.as_str()) {
                h.set_level(v);
            }
            if let Some(v) = params.get("studyMode").and_then(|v| v.as_str()) {
                h.set_study_mode(v);
            }
            if let Some(v) = params.get("location").and_then(|v| v.as_str()) {
                h.set_location(v);
            }
            if let Some(key) = sort_by {
                h.set_sort_by(key);
            }
            to_json(h.filters())
        }
        "filters.reset" => {
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.reset_filters();
            to_json(h.filters())
        }

        // ─── Bookmarks ───
        "bookmark.toggle" => {
            let id = str_param(params, "id")?;
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.require_programme(id).map_err(|e| e.to_string())?;
            let bookmarked = h.on_bookmark_toggle(id);
            Ok(json!({"id": id, "bookmarked": bookmarked}))
        }
        "bookmark.add" => {
            let id = str_param(params, "id")?;
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.bookmarks_mut().add_bookmark(id);
            Ok(json!({"ok": true}))
        }
        "bookmark.remove" => {
            let id = str_param(params, "id")?;
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.bookmarks_mut().remove_bookmark(id);
            Ok(json!({"ok": true}))
        }
        "bookmark.list" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            programme_list(&h.bookmarked_programmes())
        }
        "bookmark.clear" => {
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.bookmarks_mut().clear_all_bookmarks();
            Ok(json!({"ok": true}))
        }
        "bookmark.check" => {
            let id = str_param(params, "id")?;
            let h = hub.lock().map_err(|e| e.to_string())?;
            Ok(json!({"id": id, "bookmarked": h.bookmarks().is_bookmarked(id)}))
        }

        // ─── Compare ───
        "compare.toggle" => {
            let id = str_param(params, "id")?;
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            if !h.compare().is_in_compare(id) {
                h.require_programme(id).map_err(|e| e.to_string())?;
            }
            let in_compare = h.on_compare_toggle(id);
            Ok(json!({
                "id": id,
                "inCompare": in_compare,
                "count": h.compare().len(),
                "full": h.compare().is_full(),
            }))
        }
        "compare.remove" => {
            let id = str_param(params, "id")?;
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.compare_mut().remove_from_compare(id);
            Ok(json!({"ok": true}))
        }
        "compare.clear" => {
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.compare_mut().clear_compare();
            Ok(json!({"ok": true}))
        }
        "compare.list" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            to_json(h.compare().items())
        }
        "compare.metrics" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            to_json(&h.compare().comparison_metrics())
        }
        "compare.winner" => {
            let label = str_param(params, "label")?;
            let h = hub.lock().map_err(|e| e.to_string())?;
            Ok(json!({"label": label, "winner": h.compare().get_metric_winner(label)}))
        }

        // ─── Recent searches ───
        "recent.list" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            to_json(h.recent().entries())
        }
        "recent.save" => {
            let term = str_param(params, "term")?;
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.recent_mut().save_to_recent_searches(term);
            to_json(h.recent().entries())
        }
        "recent.clear" => {
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.recent_mut().clear_recent_searches();
            Ok(json!({"ok": true}))
        }

        // ─── Selection ───
        "programme.select" => {
            let id = str_param(params, "id")?;
            let mut h = hub.lock().map_err(|e| e.to_string())?;
            h.require_programme(id).map_err(|e| e.to_string())?;
            h.on_select(id);
            to_json(&h.selected_programme())
        }

        // ─── Settings ───
        "settings.get" => {
            let h = hub.lock().map_err(|e| e.to_string())?;
            to_json(h.settings())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
