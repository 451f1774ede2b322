use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordering applied to the filtered programme list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Highest rating first.
    #[default]
    Rating,
    /// Highest employment rate first.
    Employment,
    /// Alphabetical by title.
    Title,
    /// Shortest duration first.
    Duration,
    /// Cheapest fees first.
    Fees,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Rating,
        SortKey::Employment,
        SortKey::Title,
        SortKey::Duration,
        SortKey::Fees,
    ];

    /// Key used by hosts and the settings file.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Employment => "employment",
            SortKey::Title => "title",
            SortKey::Duration => "duration",
            SortKey::Fees => "fees",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rating" => Ok(SortKey::Rating),
            "employment" | "employment_rate" => Ok(SortKey::Employment),
            "title" | "name" => Ok(SortKey::Title),
            "duration" => Ok(SortKey::Duration),
            "fees" | "price" => Ok(SortKey::Fees),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// Current search text, facet selections and ordering.
///
/// Empty facet strings mean "no restriction".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub search_term: String,
    pub category: String,
    pub level: String,
    pub study_mode: String,
    pub location: String,
    pub sort_by: SortKey,
}

impl FilterState {
    /// Restores every field to its default.
    pub fn reset(&mut self) {
        *self = FilterState::default();
    }

    /// True when any facet (not the search text) narrows the catalog.
    pub fn has_active_facets(&self) -> bool {
        !self.category.is_empty()
            || !self.level.is_empty()
            || !self.study_mode.is_empty()
            || !self.location.is_empty()
    }
}
