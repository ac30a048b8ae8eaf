use crate::math::stats::StatsHelper;
use crate::model::{Anomaly, MetricRegistry, Observation, ObservationSeries};
use crate::prelude::SummaryConfig;
use crate::telemetry::log::LogManager;

/// Returned by range digests when the selected slice holds no observations.
pub const NO_DATA_IN_RANGE: &str = "No data in the selected range.";

/// Renders series and anomalies into plain-text digests for a language model.
pub struct Summarizer {
    config: SummaryConfig,
    logger: LogManager,
}

impl Summarizer {
    pub fn new(config: SummaryConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("summary"),
        }
    }

    /// Whole-flight digest: duration, per-metric extremes and the first
    /// anomalies in detector order.
    pub fn full(
        &self,
        series: &ObservationSeries,
        registry: &MetricRegistry,
        anomalies: &[Anomaly],
    ) -> String {
        let mut lines = Vec::new();

        match series.duration() {
            Some(duration) => lines.push(format!("Flight duration: {:.1} s.", duration)),
            None => lines.push("Flight duration: n/a (no observations).".to_string()),
        }
        lines.push(format!("Metrics analyzed: {}.", display_names(registry)));
        lines.push(format!("Total anomalies detected: {}.", anomalies.len()));

        for metric in registry {
            let values: Vec<f64> = series.values_of(&metric.id).collect();
            if let Some((min, max)) = StatsHelper::min_max(&values) {
                lines.push(format!(
                    "- {}: max {:.2}{unit}, min {:.2}{unit}.",
                    metric.display_name,
                    max,
                    min,
                    unit = metric.unit
                ));
            }
        }

        if !anomalies.is_empty() {
            lines.push("\nNotable anomalies:".to_string());
            for anomaly in anomalies.iter().take(self.config.max_listed_anomalies) {
                lines.push(format!(
                    "- T+{:.1}s: {} value {:.2} (Z-Score: {:.1})",
                    anomaly.timestamp, anomaly.metric_id, anomaly.value, anomaly.z_score
                ));
            }
        }

        let digest = lines.join("\n");
        self.logger.record(&format!(
            "full digest over {} observations ({} bytes)",
            series.len(),
            digest.len()
        ));
        digest
    }

    /// Digest of `series[start..=end]` for the selected metrics.
    ///
    /// Missing readings count as 0 in min/max/mean. The trend block samples
    /// every `max(1, len / trend_points)`-th observation from the first, so
    /// it may hold more lines than `trend_points` and may skip the last one.
    pub fn range(
        &self,
        series: &ObservationSeries,
        selected: &MetricRegistry,
        start: usize,
        end: usize,
    ) -> String {
        let slice = series.slice_inclusive(start, end);
        let (Some(first), Some(last)) = (slice.first(), slice.last()) else {
            self.logger
                .record(&format!("range {}..={} is empty", start, end));
            return NO_DATA_IN_RANGE.to_string();
        };

        let mut lines = vec![
            format!(
                "Time range: T+{:.1}s to T+{:.1}s",
                first.timestamp, last.timestamp
            ),
            format!("Metrics analyzed: {}", display_names(selected)),
        ];

        for metric in selected {
            let values: Vec<f64> = slice
                .iter()
                .map(|o| o.value(&metric.id).unwrap_or(0.0))
                .collect();
            let (min, max) = StatsHelper::min_max(&values).unwrap_or((0.0, 0.0));
            lines.push(format!(
                "- {}: min {:.2}, max {:.2}, mean {:.2} {}",
                metric.display_name,
                min,
                max,
                StatsHelper::mean(&values),
                metric.unit
            ));
        }

        lines.push("\nSampled points (trend context):".to_string());
        let stride = (slice.len() / self.config.trend_points.max(1)).max(1);
        for observation in slice.iter().step_by(stride) {
            lines.push(trend_line(observation, selected));
        }

        self.logger.record(&format!(
            "range digest over {} observations, stride {}",
            slice.len(),
            stride
        ));
        lines.join("\n")
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(SummaryConfig::default())
    }
}

fn display_names(registry: &MetricRegistry) -> String {
    registry
        .iter()
        .map(|m| m.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn trend_line(observation: &Observation, selected: &MetricRegistry) -> String {
    let readings = selected
        .iter()
        .map(|metric| match observation.value(&metric.id) {
            Some(value) => format!("{}: {:.2}", metric.display_name, value),
            None => format!("{}: n/a", metric.display_name),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("@ T+{:.1}s: {}", observation.timestamp, readings)
}

/// Whole-series digest with the default layout.
pub fn summarize_full(
    series: &ObservationSeries,
    registry: &MetricRegistry,
    anomalies: &[Anomaly],
) -> String {
    Summarizer::default().full(series, registry, anomalies)
}

/// Range digest with the default layout.
pub fn summarize_range(
    series: &ObservationSeries,
    selected: &MetricRegistry,
    start: usize,
    end: usize,
) -> String {
    Summarizer::default().range(series, selected, start, end)
}
