//! Coursefinder RPC Server: JSON-RPC over stdin/stdout for the hub page host.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"search.input", "params":{"term":"solar"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr so stdout carries protocol lines only.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use coursefinder::app::EducationHub;
use coursefinder::database;
use coursefinder::logging;
use coursefinder::rpc_handler::handle_method;
use coursefinder::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use coursefinder::types::settings::HubSettings;

use serde_json::{json, Value};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        let elapsed = self.window_start.elapsed();
        if elapsed.as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn respond(value: &Value) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{}", value);
    let _ = out.flush();
}

fn load_settings() -> HubSettings {
    let mut engine = SettingsEngine::new(std::env::var("COURSEFINDER_CONFIG").ok());
    match engine.load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %engine.get_config_path(), error = %e, "[Settings] Using defaults");
            HubSettings::default()
        }
    }
}

fn load_initial_catalog(hub: &mut EducationHub) {
    if hub.settings().catalog.source.is_none() {
        return;
    }
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::warn!(error = %e, "[Catalog] Could not start runtime; catalog not loaded");
            return;
        }
    };
    match runtime.block_on(hub.refresh_catalog(false)) {
        Ok(()) => tracing::info!(
            programmes = hub.catalog().len(),
            cached = hub.catalog_status().is_cached,
            "[Catalog] Ready"
        ),
        Err(e) => tracing::warn!(error = %e, "[Catalog] Initial load failed"),
    }
}

fn main() {
    logging::init();

    let settings = load_settings();
    let storage = database::open_shared(&settings.storage);
    let mut hub = EducationHub::new(storage, &settings);
    load_initial_catalog(&mut hub);
    let hub = Mutex::new(hub);

    // Signal ready
    respond(&json!({"event":"ready","version":env!("CARGO_PKG_VERSION")}));

    let mut rate_limiter = RateLimiter::new(200);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() { continue; }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                respond(&json!({"id":null,"error":format!("parse error: {}",e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            respond(&json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&hub, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                tracing::debug!(method, error = %err, "request failed");
                json!({"id": id, "error": err})
            }
        };
        respond(&response);
    }
}
