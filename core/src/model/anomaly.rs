use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity taxonomy for flagged readings.
///
/// `Low` is reserved; the z-score detector only emits `Medium` and `High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}

/// A single metric reading whose z-score exceeded the outlier threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub timestamp: f64,
    pub metric_id: String,
    pub value: f64,
    pub z_score: f64,
    pub severity: Severity,
}

impl Anomaly {
    pub fn new(
        timestamp: f64,
        metric_id: impl Into<String>,
        value: f64,
        z_score: f64,
        severity: Severity,
    ) -> Self {
        Self {
            timestamp,
            metric_id: metric_id.into(),
            value,
            z_score,
            severity,
        }
    }
}
