//! Coursefinder: command-line front end for the education hub catalog engine.
//!
//! Loads the catalog (from `--catalog` or the configured source, through the
//! storage cache), then runs one command against it. Bookmarks and recent
//! searches persist in the configured SQLite store between runs.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::time::Instant;

use coursefinder::app::EducationHub;
use coursefinder::database;
use coursefinder::interactions::CatalogInteractions;
use coursefinder::logging;
use coursefinder::managers::bookmark_manager::BookmarkManagerTrait;
use coursefinder::managers::compare_manager::CompareManagerTrait;
use coursefinder::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use coursefinder::types::filter::SortKey;
use coursefinder::types::programme::ProgrammeRecord;
use coursefinder::types::settings::HubSettings;

#[derive(Parser, Debug)]
#[command(name = "coursefinder")]
#[command(version)]
#[command(about = "Search, filter, bookmark and compare education programmes", long_about = None)]
struct Cli {
    /// Catalog JSON file or http(s) URL (overrides the configured source)
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// SQLite file for bookmarks, recent searches and the catalog cache
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    database: Option<PathBuf>,

    /// Settings file (default: platform config dir)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    config: Option<String>,

    /// Ignore a fresh catalog cache and fetch from the source
    #[arg(long, global = true)]
    refresh: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search and filter the catalog
    Search {
        /// Free-text query (title, institution, description, topics, category)
        query: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        level: Option<String>,

        /// Study mode, e.g. "Full-time"
        #[arg(long)]
        mode: Option<String>,

        /// Case-insensitive substring of a campus location
        #[arg(long)]
        location: Option<String>,

        /// rating, employment, title, duration or fees
        #[arg(long, default_value = "rating")]
        sort: SortKey,
    },

    /// List categories with programme counts
    Categories,

    /// Manage bookmarked programmes
    Bookmark {
        #[command(subcommand)]
        action: BookmarkAction,
    },

    /// Show or clear recent searches
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },

    /// Compare programmes side by side
    Compare {
        /// Programme ids (at least two)
        #[arg(num_args = 2..)]
        ids: Vec<String>,
    },

    /// Inspect or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum BookmarkAction {
    /// Bookmark a programme, or remove its bookmark
    Toggle { id: String },
    /// List bookmarked programmes
    List,
    /// Remove every bookmark
    Clear,
}

#[derive(Subcommand, Debug)]
enum RecentAction {
    List,
    Clear,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Set one value by dot path, e.g. `search.debounce_ms 150`
    Set { key: String, value: String },
    /// Restore defaults
    Reset,
    /// Print the settings file location
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init();

    let mut engine = SettingsEngine::new(cli.config.clone());
    let mut settings = engine.load()?;
    if let Some(path) = &cli.database {
        settings.storage.database_path = Some(path.to_string_lossy().to_string());
    }
    if let Some(source) = &cli.catalog {
        settings.catalog.source = Some(source.clone());
    }

    match cli.command {
        Commands::Search { query, category, level, mode, location, sort } => {
            let mut hub = open_hub(&settings, cli.refresh).await?;
            if let Some(v) = category.as_deref() {
                hub.set_category(v);
            }
            if let Some(v) = level.as_deref() {
                hub.set_level(v);
            }
            if let Some(v) = mode.as_deref() {
                hub.set_study_mode(v);
            }
            if let Some(v) = location.as_deref() {
                hub.set_location(v);
            }
            hub.set_sort_by(sort);
            if let Some(q) = query.as_deref() {
                hub.set_search_term(q, Instant::now());
                hub.settle_search().await;
                hub.submit_search();
            }
            let results = hub.filtered_programmes();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{} programme(s)", results.len());
                for p in results {
                    print_programme(p, hub.bookmarks().is_bookmarked(&p.id));
                }
            }
        }
        Commands::Categories => {
            let hub = open_hub(&settings, cli.refresh).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(hub.category_facets())?);
            } else {
                for facet in hub.category_facets() {
                    println!("{:>4}  {}", facet.count, facet.name);
                }
            }
        }
        Commands::Bookmark { action } => {
            let mut hub = open_hub(&settings, cli.refresh).await?;
            match action {
                BookmarkAction::Toggle { id } => {
                    hub.require_programme(&id)?;
                    let bookmarked = hub.on_bookmark_toggle(&id);
                    println!("{} {}", if bookmarked { "Bookmarked" } else { "Removed bookmark" }, id);
                }
                BookmarkAction::List => {
                    let saved = hub.bookmarked_programmes();
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&saved)?);
                    } else {
                        println!("{} bookmark(s)", saved.len());
                        for p in saved {
                            print_programme(p, true);
                        }
                    }
                }
                BookmarkAction::Clear => {
                    hub.bookmarks_mut().clear_all_bookmarks();
                    println!("Bookmarks cleared");
                }
            }
        }
        Commands::Recent { action } => {
            // Recent searches do not need the catalog.
            let storage = database::open_shared(&settings.storage);
            let mut hub = EducationHub::new(storage, &settings);
            match action {
                RecentAction::List => {
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(hub.recent().entries())?);
                    } else {
                        for term in hub.recent().entries() {
                            println!("{}", term);
                        }
                    }
                }
                RecentAction::Clear => {
                    hub.recent_mut().clear_recent_searches();
                    println!("Recent searches cleared");
                }
            }
        }
        Commands::Compare { ids } => {
            let mut hub = open_hub(&settings, cli.refresh).await?;
            for id in &ids {
                if !hub.add_to_compare(id)? {
                    tracing::warn!(id = %id, max = hub.compare().max_items(), "compare list full; skipped");
                }
            }
            let metrics = hub.compare().comparison_metrics();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                let titles: Vec<&str> = hub.compare().items().iter().map(|p| p.title.as_str()).collect();
                println!("{:<16} {}", "", titles.join(" | "));
                for metric in &metrics {
                    let winner = hub.compare().get_metric_winner(&metric.label);
                    let cells: Vec<String> = metric
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| if winner == Some(i) { format!("{} *", v) } else { v.to_string() })
                        .collect();
                    println!("{:<16} {}", metric.label, cells.join(" | "));
                }
            }
        }
        Commands::Config { action } => run_config(&mut engine, &action)?,
    }

    Ok(())
}

/// Opens storage and loads the catalog through the cache.
async fn open_hub(settings: &HubSettings, refresh: bool) -> Result<EducationHub, Box<dyn Error>> {
    let storage = database::open_shared(&settings.storage);
    let mut hub = EducationHub::new(storage, settings);
    hub.refresh_catalog(refresh).await?;
    let status = hub.catalog_status();
    if status.is_cached {
        if let Some(at) = status.last_updated {
            tracing::info!(fetched_at = %at.to_rfc3339(), "using cached catalog");
        }
    }
    Ok(hub)
}

fn run_config(engine: &mut SettingsEngine, action: &ConfigAction) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(engine.get_settings())?);
        }
        ConfigAction::Set { key, value } => {
            // Accept bare strings as well as JSON literals.
            let parsed = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.clone()));
            engine.set_value(key, parsed)?;
            println!("{} updated", key);
        }
        ConfigAction::Reset => {
            engine.reset()?;
            println!("Settings reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", engine.get_config_path());
        }
    }
    Ok(())
}

fn print_programme(p: &ProgrammeRecord, bookmarked: bool) {
    let mark = if bookmarked { "★" } else { " " };
    println!(
        "{} {:<12} {} ({}) [{} / {} / {}] rating {:.1}",
        mark,
        p.id,
        p.title,
        p.institution,
        p.level,
        p.study_mode,
        p.location_label(),
        p.rating_or_zero()
    );
}
