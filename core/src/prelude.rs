use crate::model::{Anomaly, MetricRegistry, ObservationSeries};
use serde::{Deserialize, Serialize};

/// Options for turning delimited text into an observation series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    pub delimiter: char,
    /// Header substrings that bind a column to the timestamp field.
    pub time_tokens: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            time_tokens: vec!["time".into(), "sec".into()],
        }
    }
}

/// Z-score thresholds for the outlier detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    pub z_threshold: f64,
    pub high_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            z_threshold: 3.0,
            high_threshold: 5.0,
        }
    }
}

/// Shape of the textual digests handed to the analysis service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SummaryConfig {
    pub max_listed_anomalies: usize,
    pub trend_points: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_listed_anomalies: 10,
            trend_points: 5,
        }
    }
}

/// Errors raised while building or editing a metric registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("metric id must not be empty")]
    EmptyId,
    #[error("duplicate metric id: {0}")]
    DuplicateId(String),
    #[error("unknown metric id: {0}")]
    UnknownMetric(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Outlier detectors that derive a fresh anomaly list from a series.
pub trait Detector {
    fn name(&self) -> &str;
    fn detect(&self, series: &ObservationSeries, registry: &MetricRegistry) -> Vec<Anomaly>;
}
