use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;

/// One timestamped sample covering any subset of the registry's metrics.
///
/// Keys in `values` are metric ids; a missing key means "no reading". Stored
/// values are always finite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Observation {
    pub timestamp: f64,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl Observation {
    pub fn new(timestamp: f64) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert. Non-finite readings are dropped.
    pub fn with(mut self, metric_id: impl Into<String>, value: f64) -> Self {
        self.insert(metric_id, value);
        self
    }

    pub fn insert(&mut self, metric_id: impl Into<String>, value: f64) {
        if value.is_finite() {
            self.values.insert(metric_id.into(), value);
        }
    }

    pub fn value(&self, metric_id: &str) -> Option<f64> {
        self.values.get(metric_id).copied()
    }

    pub fn has_readings(&self) -> bool {
        !self.values.is_empty()
    }
}

/// Where the timestamps of a series came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Read from a time-like CSV column.
    #[default]
    Column,
    /// Synthesized from the 1-based row index at 1 Hz.
    RowIndex,
    /// Produced by the synthetic profile generator.
    Generated,
}

/// Ordered, index-addressable observations. Never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ObservationSeries {
    pub observations: Vec<Observation>,
    pub timestamp_source: TimestampSource,
}

impl ObservationSeries {
    pub fn new(observations: Vec<Observation>, timestamp_source: TimestampSource) -> Self {
        Self {
            observations,
            timestamp_source,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    /// Timestamp of the last observation.
    pub fn duration(&self) -> Option<f64> {
        self.observations.last().map(|o| o.timestamp)
    }

    /// `series[start..=end]`, with `end` clamped to the last index.
    ///
    /// Empty when `start > end` or `start` is past the end.
    pub fn slice_inclusive(&self, start: usize, end: usize) -> &[Observation] {
        if start > end || start >= self.observations.len() {
            return &[];
        }
        let end = end.min(self.observations.len() - 1);
        &self.observations[start..=end]
    }

    /// Defined readings for one metric, in series order.
    pub fn values_of<'a>(&'a self, metric_id: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.observations.iter().filter_map(move |o| o.value(metric_id))
    }
}

impl Index<usize> for ObservationSeries {
    type Output = Observation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.observations[index]
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> ObservationSeries {
        let observations = (0..n)
            .map(|i| Observation::new(i as f64 * 0.5).with("altitude", i as f64))
            .collect();
        ObservationSeries::new(observations, TimestampSource::Column)
    }

    #[test]
    fn observation_drops_non_finite_readings() {
        let obs = Observation::new(0.0)
            .with("a", f64::NAN)
            .with("b", f64::INFINITY)
            .with("c", 1.5);
        assert_eq!(obs.value("a"), None);
        assert_eq!(obs.value("b"), None);
        assert_eq!(obs.value("c"), Some(1.5));
    }

    #[test]
    fn observation_serializes_flat() {
        let obs = Observation::new(2.0).with("altitude", 100.0);
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json, serde_json::json!({"timestamp": 2.0, "altitude": 100.0}));

        let back: Observation = serde_json::from_value(json).unwrap();
        assert_eq!(back, obs);
    }

    #[test]
    fn slice_inclusive_clamps_and_guards() {
        let s = series(4);
        assert_eq!(s.slice_inclusive(1, 2).len(), 2);
        assert_eq!(s.slice_inclusive(2, 99).len(), 2);
        assert!(s.slice_inclusive(3, 1).is_empty());
        assert!(s.slice_inclusive(7, 9).is_empty());
        assert!(series(0).slice_inclusive(0, 0).is_empty());
    }

    #[test]
    fn duration_is_last_timestamp() {
        assert_eq!(series(3).duration(), Some(1.0));
        assert_eq!(series(0).duration(), None);
        assert_eq!(series(3)[2].timestamp, 1.0);
    }
}
