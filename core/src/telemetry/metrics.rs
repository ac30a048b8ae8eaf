use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters for pipeline runs served to the presentation layer.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub runs: usize,
    pub anomalies: usize,
    pub failures: usize,
}

#[derive(Default)]
struct Metrics {
    runs: usize,
    anomalies: usize,
    failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_run(&self, anomaly_count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.runs += 1;
            metrics.anomalies += anomaly_count;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                runs: metrics.runs,
                anomalies: metrics.anomalies,
                failures: metrics.failures,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
