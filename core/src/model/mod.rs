pub mod anomaly;
pub mod metric;
pub mod observation;

pub use anomaly::{Anomaly, Severity};
pub use metric::{MetricDescriptor, MetricRegistry};
pub use observation::{Observation, ObservationSeries, TimestampSource};
