use crate::analysis::request::ModelSettings;
use crate::generator::profile::FlightProfileConfig;
use anyhow::Context;
use flightcore::model::{MetricDescriptor, MetricRegistry};
use flightcore::prelude::{DetectorConfig, IngestOptions, SummaryConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    pub bind: SocketAddr,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
        }
    }
}

/// Everything a pipeline run needs, passed explicitly into each stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub metrics: Vec<MetricDescriptor>,
    pub ingest: IngestOptions,
    pub detector: DetectorConfig,
    pub summary: SummaryConfig,
    pub profile: FlightProfileConfig,
    pub model: ModelSettings,
    pub bridge: BridgeConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            metrics: MetricRegistry::flight_defaults().as_slice().to_vec(),
            ingest: IngestOptions::default(),
            detector: DetectorConfig::default(),
            summary: SummaryConfig::default(),
            profile: FlightProfileConfig::default(),
            model: ModelSettings::default(),
            bridge: BridgeConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .registry()
            .with_context(|| format!("validating metrics in {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(seed: Option<u64>, z_threshold: Option<f64>) -> Self {
        Self::default().with_overrides(seed, z_threshold)
    }

    /// Command-line values win over whatever the config carries.
    pub fn with_overrides(mut self, seed: Option<u64>, z_threshold: Option<f64>) -> Self {
        if seed.is_some() {
            self.profile.seed = seed;
        }
        if let Some(z_threshold) = z_threshold {
            self.detector.z_threshold = z_threshold;
        }
        self
    }

    pub fn registry(&self) -> anyhow::Result<MetricRegistry> {
        MetricRegistry::new(self.metrics.clone()).context("building metric registry")
    }
}
