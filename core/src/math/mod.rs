pub mod stats;

pub use stats::{MetricStats, StatsHelper};
