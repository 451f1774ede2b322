// Search / filter / sort engine
// Pure transform from (catalog, filter state) to an ordered result list.
// Text match, then facets, then a single stable sort. Numeric fields that do not parse count as 0.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::types::filter::{FilterState, SortKey};
use crate::types::programme::ProgrammeRecord;

/// Search terms shorter than this (in characters) do not filter.
pub const MIN_SEARCH_LENGTH: usize = 2;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("static pattern is valid"));

/// Returns the first run of ASCII digits in `text` as an integer, 0 if there is none.
pub fn extract_first_number(text: &str) -> u64 {
    FIRST_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Concatenates every ASCII digit in `text` into one integer, 0 if empty or too large.
pub fn extract_digits(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Lower-cased text with diacritics folded onto their base letters ("É" -> "e").
fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style ordering: accents and case only break ties, lower case first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// True when `needle` (already lower-cased) occurs in any searchable field.
pub fn matches_text(record: &ProgrammeRecord, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(&record.title)
        || contains(&record.institution)
        || contains(&record.description)
        || record.key_topics.iter().any(|topic| contains(topic))
        || contains(&record.category)
}

/// True when the record satisfies every active facet of `filter`.
pub fn matches_facets(record: &ProgrammeRecord, filter: &FilterState) -> bool {
    if !filter.category.is_empty() && record.category != filter.category {
        return false;
    }
    if !filter.level.is_empty() && record.level != filter.level {
        return false;
    }
    if !filter.study_mode.is_empty() && record.study_mode != filter.study_mode {
        return false;
    }
    if !filter.location.is_empty() {
        let wanted = filter.location.to_lowercase();
        if !record
            .locations
            .iter()
            .any(|loc| loc.to_lowercase().contains(&wanted))
        {
            return false;
        }
    }
    true
}

/// Comparator for a sort key. Descending keys put larger values first.
pub fn compare_by(key: SortKey, a: &ProgrammeRecord, b: &ProgrammeRecord) -> Ordering {
    match key {
        SortKey::Rating => b.rating_or_zero().total_cmp(&a.rating_or_zero()),
        SortKey::Employment => b
            .employment_rate_or_zero()
            .total_cmp(&a.employment_rate_or_zero()),
        SortKey::Title => locale_compare(&a.title, &b.title),
        SortKey::Duration => a.duration_value().cmp(&b.duration_value()),
        SortKey::Fees => a.fees_value().cmp(&b.fees_value()),
    }
}

/// Stable in-place sort of a result list.
pub fn sort_programmes(results: &mut [&ProgrammeRecord], key: SortKey) {
    results.sort_by(|a, b| compare_by(key, a, b));
}

/// Applies text search, facet filters and ordering to `catalog`.
///
/// `filter.search_term` is expected to be the committed (debounced) term.
/// The catalog itself is never modified.
pub fn compute_filtered_programmes<'a>(
    catalog: &'a [ProgrammeRecord],
    filter: &FilterState,
) -> Vec<&'a ProgrammeRecord> {
    let needle = if filter.search_term.chars().count() >= MIN_SEARCH_LENGTH {
        Some(filter.search_term.to_lowercase())
    } else {
        None
    };

    let mut results: Vec<&ProgrammeRecord> = catalog
        .iter()
        .filter(|record| needle.as_deref().map_or(true, |n| matches_text(record, n)))
        .filter(|record| matches_facets(record, filter))
        .collect();

    sort_programmes(&mut results, filter.sort_by);

    tracing::trace!(
        term = %filter.search_term,
        sort = %filter.sort_by,
        results = results.len(),
        "programmes filtered"
    );
    results
}
