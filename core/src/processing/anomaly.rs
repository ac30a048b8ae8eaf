use crate::math::stats::{MetricStats, StatsHelper};
use crate::model::{Anomaly, MetricRegistry, ObservationSeries, Severity};
use crate::prelude::{Detector, DetectorConfig};
use crate::telemetry::log::LogManager;

/// Whole-series z-score outlier detector.
///
/// Each metric is scored independently against its own population mean and
/// standard deviation. Results are grouped by registry order, then series
/// order; they are not sorted by timestamp.
pub struct ZScoreDetector {
    config: DetectorConfig,
    logger: LogManager,
}

impl ZScoreDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("detector"),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Mean and population deviation of a metric, `None` without readings.
    pub fn metric_stats(series: &ObservationSeries, metric_id: &str) -> Option<MetricStats> {
        let values: Vec<f64> = series.values_of(metric_id).collect();
        StatsHelper::describe(&values)
    }

    fn classify(&self, z_score: f64) -> Option<Severity> {
        if z_score > self.config.high_threshold {
            Some(Severity::High)
        } else if z_score > self.config.z_threshold {
            Some(Severity::Medium)
        } else {
            None
        }
    }
}

impl Detector for ZScoreDetector {
    fn name(&self) -> &str {
        "zscore"
    }

    fn detect(&self, series: &ObservationSeries, registry: &MetricRegistry) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        for metric in registry {
            let Some(stats) = Self::metric_stats(series, &metric.id) else {
                continue;
            };

            let before = anomalies.len();
            for observation in series {
                let Some(value) = observation.value(&metric.id) else {
                    continue;
                };
                let z_score = stats.z_score(value);
                if let Some(severity) = self.classify(z_score) {
                    anomalies.push(Anomaly::new(
                        observation.timestamp,
                        metric.id.clone(),
                        value,
                        z_score,
                        severity,
                    ));
                }
            }

            let flagged = anomalies.len() - before;
            if flagged > 0 {
                self.logger.trace_detail(&format!(
                    "{}: {} outliers (mean {:.3}, std {:.3})",
                    metric.id, flagged, stats.mean, stats.std_dev
                ));
            }
        }

        self.logger.record(&format!(
            "{} anomalies across {} metrics",
            anomalies.len(),
            registry.len()
        ));
        anomalies
    }
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

/// Runs the default z-score detector.
pub fn detect(series: &ObservationSeries, registry: &MetricRegistry) -> Vec<Anomaly> {
    ZScoreDetector::default().detect(series, registry)
}
