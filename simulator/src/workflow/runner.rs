use crate::generator::profile::generate_with;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use flightcore::model::{Anomaly, MetricRegistry, ObservationSeries};
use flightcore::prelude::Detector;
use flightcore::processing::{CsvIngestor, Summarizer, ZScoreDetector};
use std::fs;
use std::path::Path;

pub struct WorkflowResult {
    pub series: ObservationSeries,
    pub anomalies: Vec<Anomaly>,
    pub full_summary: String,
}

/// Sequences ingest/generate, detect and summarize with one fixed config.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    registry: MetricRegistry,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        let registry = config.registry()?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn ingest_text(&self, raw: &str) -> ObservationSeries {
        CsvIngestor::new(self.config.ingest.clone()).ingest(raw, &self.registry)
    }

    pub fn ingest_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<ObservationSeries> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)
            .with_context(|| format!("reading telemetry csv {}", path_ref.display()))?;
        Ok(self.ingest_text(&raw))
    }

    pub fn generate(&self) -> ObservationSeries {
        generate_with(&self.config.profile)
    }

    pub fn execute(&self, series: ObservationSeries) -> WorkflowResult {
        let detector = ZScoreDetector::new(self.config.detector);
        let anomalies = detector.detect(&series, &self.registry);
        let full_summary =
            Summarizer::new(self.config.summary).full(&series, &self.registry, &anomalies);

        log::info!(
            "{} pass: {} observations, {} anomalies",
            detector.name(),
            series.len(),
            anomalies.len()
        );
        WorkflowResult {
            series,
            anomalies,
            full_summary,
        }
    }

    /// Range digest for the given metric ids; unknown ids are ignored.
    pub fn summarize_range<S: AsRef<str>>(
        &self,
        series: &ObservationSeries,
        metric_ids: &[S],
        start: usize,
        end: usize,
    ) -> String {
        let selected = if metric_ids.is_empty() {
            self.registry.defaults()
        } else {
            self.registry.select(metric_ids)
        };
        Summarizer::new(self.config.summary).range(series, &selected, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightcore::processing::NO_DATA_IN_RANGE;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn runner() -> Runner {
        let mut cfg = WorkflowConfig::from_args(Some(11), None);
        cfg.profile.duration_secs = 200;
        Runner::new(cfg).unwrap()
    }

    #[test]
    fn runner_executes_generated_workflow() {
        let runner = runner();
        let result = runner.execute(runner.generate());

        assert_eq!(result.series.len(), 2001);
        assert!(result
            .anomalies
            .iter()
            .any(|a| a.metric_id == "temp_engine"));
        assert!(result.full_summary.starts_with("Flight duration: 200.0 s."));
    }

    #[test]
    fn runner_ingests_csv_files() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"time,altitude,velocity\n0,0,0\n1,10,5\n2,25,9\n")
            .unwrap();
        let path = temp.into_temp_path();

        let runner = runner();
        let series = runner.ingest_file(&path).unwrap();
        let result = runner.execute(series);
        assert_eq!(result.series.len(), 3);
        assert!(result.anomalies.is_empty());
        assert!(result.full_summary.contains("Total anomalies detected: 0."));
    }

    #[test]
    fn runner_reports_missing_files() {
        assert!(runner().ingest_file("/nonexistent/flight.csv").is_err());
    }

    #[test]
    fn range_summary_falls_back_to_default_metrics() {
        let runner = runner();
        let series = runner.generate();
        let no_ids: [&str; 0] = [];

        let digest = runner.summarize_range(&series, &no_ids, 0, 9);
        assert!(digest.contains("Metrics analyzed: Altitude, Velocity, Acceleration"));

        let digest = runner.summarize_range(&series, &["temp_engine"], 1195, 1205);
        assert!(digest.contains("Metrics analyzed: Engine Temp"));
        assert_eq!(runner.summarize_range(&series, &["temp_engine"], 9, 3), NO_DATA_IN_RANGE);
    }
}
