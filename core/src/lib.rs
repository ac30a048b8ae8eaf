//! Analysis core for flight telemetry.
//!
//! Raw CSV text or a generated series flows through ingestion, per-metric
//! outlier detection and textual summarization. Every operation is a pure
//! function of its arguments; registries and configs are passed in
//! explicitly rather than read from shared state.

pub mod math;
pub mod model;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use model::{
    Anomaly, MetricDescriptor, MetricRegistry, Observation, ObservationSeries, Severity,
    TimestampSource,
};
pub use prelude::{Detector, RegistryError, RegistryResult};
pub use processing::{detect, ingest, summarize_full, summarize_range};
