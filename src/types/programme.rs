use serde::{Deserialize, Serialize};

use crate::services::search_engine::{extract_first_number, extract_digits};

/// Location label shown for programmes that list no physical campus.
pub const ONLINE_LOCATION: &str = "Online";

/// A course or programme in the education catalog.
///
/// Records are owned by the catalog snapshot; stores refer to them by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammeRecord {
    pub id: String,
    pub title: String,
    pub institution: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub level: String,
    pub study_mode: String,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub employment_rate: Option<f64>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tuition_fees: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
}

impl ProgrammeRecord {
    /// Rating in `[0, 5]`, or 0 when the source omitted it.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Employment rate in `[0, 100]`, or 0 when the source omitted it.
    pub fn employment_rate_or_zero(&self) -> f64 {
        self.employment_rate.unwrap_or(0.0)
    }

    /// First integer in the duration text ("18 months" -> 18), 0 if none.
    pub fn duration_value(&self) -> u64 {
        extract_first_number(&self.duration)
    }

    /// All digits of the fee text as one integer ("£9,250" -> 9250), 0 if none.
    pub fn fees_value(&self) -> u64 {
        extract_digits(&self.tuition_fees)
    }

    /// Human-readable location list; empty means the programme is online.
    pub fn location_label(&self) -> String {
        if self.locations.is_empty() {
            ONLINE_LOCATION.to_string()
        } else {
            self.locations.join(", ")
        }
    }
}

/// Facet value and how many catalog records carry it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryFacet {
    pub name: String,
    pub count: usize,
}
