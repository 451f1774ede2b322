use crate::types::compare::{ComparisonMetric, MetricKind, MetricValue};
use crate::types::programme::ProgrammeRecord;

/// Default number of programmes that can be compared side by side.
pub const MAX_COMPARE_ITEMS: usize = 3;

pub const METRIC_RATING: &str = "Rating";
pub const METRIC_EMPLOYMENT_RATE: &str = "Employment Rate";
pub const METRIC_DURATION: &str = "Duration";
pub const METRIC_FEES: &str = "Fees";
pub const METRIC_STUDY_MODE: &str = "Study Mode";
pub const METRIC_LOCATION: &str = "Location";
pub const METRIC_LEVEL: &str = "Level";

/// Trait defining the compare list interface.
pub trait CompareManagerTrait {
    fn is_in_compare(&self, id: &str) -> bool;
    fn add_to_compare(&mut self, record: &ProgrammeRecord) -> bool;
    fn remove_from_compare(&mut self, id: &str);
    fn toggle_compare(&mut self, record: &ProgrammeRecord) -> bool;
    fn clear_compare(&mut self);
    fn comparison_metrics(&self) -> Vec<ComparisonMetric>;
    fn get_metric_winner(&self, label: &str) -> Option<usize>;
}

/// In-memory, capacity-bounded list of programmes picked for comparison.
///
/// Holds full record snapshots. Adds beyond capacity are rejected rather than
/// evicting the oldest entry, so the host can show a "list full" message.
pub struct CompareManager {
    items: Vec<ProgrammeRecord>,
    max_items: usize,
}

impl CompareManager {
    pub fn new() -> Self {
        Self::with_capacity(MAX_COMPARE_ITEMS)
    }

    pub fn with_capacity(max_items: usize) -> Self {
        Self {
            items: Vec::with_capacity(max_items),
            max_items,
        }
    }

    pub fn items(&self) -> &[ProgrammeRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_items
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    fn progress(&self, label: &str, max: f64, value: impl Fn(&ProgrammeRecord) -> f64) -> ComparisonMetric {
        ComparisonMetric {
            label: label.to_string(),
            kind: MetricKind::Progress { max },
            values: self.items.iter().map(|p| MetricValue::Number(value(p))).collect(),
        }
    }

    fn text(&self, label: &str, value: impl Fn(&ProgrammeRecord) -> String) -> ComparisonMetric {
        ComparisonMetric {
            label: label.to_string(),
            kind: MetricKind::Text,
            values: self.items.iter().map(|p| MetricValue::Text(value(p))).collect(),
        }
    }
}

impl Default for CompareManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CompareManagerTrait for CompareManager {
    fn is_in_compare(&self, id: &str) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    /// Appends a snapshot of `record`. Returns false, leaving the list
    /// untouched, when it is full or already holds the id.
    fn add_to_compare(&mut self, record: &ProgrammeRecord) -> bool {
        if self.is_full() {
            tracing::debug!(id = %record.id, max = self.max_items, "compare list full");
            return false;
        }
        if self.is_in_compare(&record.id) {
            return false;
        }
        self.items.push(record.clone());
        true
    }

    fn remove_from_compare(&mut self, id: &str) {
        self.items.retain(|p| p.id != id);
    }

    /// Removes the record if present (returns false), otherwise tries to add it.
    fn toggle_compare(&mut self, record: &ProgrammeRecord) -> bool {
        if self.is_in_compare(&record.id) {
            self.remove_from_compare(&record.id);
            false
        } else {
            self.add_to_compare(record)
        }
    }

    fn clear_compare(&mut self) {
        self.items.clear();
    }

    /// Comparison rows in display order; empty until two programmes are picked.
    fn comparison_metrics(&self) -> Vec<ComparisonMetric> {
        if self.items.len() < 2 {
            return Vec::new();
        }
        vec![
            self.progress(METRIC_RATING, 5.0, ProgrammeRecord::rating_or_zero),
            self.progress(METRIC_EMPLOYMENT_RATE, 100.0, ProgrammeRecord::employment_rate_or_zero),
            self.text(METRIC_DURATION, |p| p.duration.clone()),
            self.text(METRIC_FEES, |p| p.tuition_fees.clone()),
            self.text(METRIC_STUDY_MODE, |p| p.study_mode.clone()),
            self.text(METRIC_LOCATION, ProgrammeRecord::location_label),
            self.text(METRIC_LEVEL, |p| p.level.clone()),
        ]
    }

    /// Index of the best value for a progress metric.
    ///
    /// `None` for text metrics, unknown labels, fewer than two entries, or
    /// when every value is equal. With a partial tie the first maximum wins.
    fn get_metric_winner(&self, label: &str) -> Option<usize> {
        let metric = self
            .comparison_metrics()
            .into_iter()
            .find(|m| m.label == label)?;
        if !matches!(metric.kind, MetricKind::Progress { .. }) {
            return None;
        }

        let values: Vec<f64> = metric.values.iter().filter_map(MetricValue::as_number).collect();
        if values.len() < 2 {
            return None;
        }
        if values.iter().all(|v| *v == values[0]) {
            return None;
        }

        let mut best = 0;
        for (i, v) in values.iter().enumerate().skip(1) {
            if *v > values[best] {
                best = i;
            }
        }
        Some(best)
    }
}
