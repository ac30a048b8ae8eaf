use flightcore::model::{Anomaly, ObservationSeries};
use flightcore::telemetry::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Latest pipeline output exposed to the charting front end.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub series: ObservationSeries,
    pub anomalies: Vec<Anomaly>,
    pub full_summary: String,
    pub run_metrics: MetricsSnapshot,
}

/// Body of a `POST /range` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeRequest {
    #[serde(default)]
    pub metrics: Vec<String>,
    pub start: usize,
    pub end: usize,
}
