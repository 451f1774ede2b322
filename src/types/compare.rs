use std::fmt;

use serde::{Deserialize, Serialize};

/// How a comparison metric is rendered and whether it can have a winner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetricKind {
    /// Numeric value drawn as a bar against `max`.
    Progress { max: f64 },
    /// Opaque text shown as-is.
    Text,
}

/// One programme's value for a metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(t) => f.write_str(t),
        }
    }
}

/// A row of the side-by-side comparison table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonMetric {
    pub label: String,
    pub kind: MetricKind,
    /// Values in compare-list order.
    pub values: Vec<MetricValue>,
}
