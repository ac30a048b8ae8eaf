use crate::prelude::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};

/// A named, unit-bearing telemetry channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    pub id: String,
    #[serde(alias = "display_name")]
    pub display_name: String,
    pub unit: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, alias = "is_default")]
    pub is_default: bool,
}

impl MetricDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        unit: impl Into<String>,
        color: impl Into<String>,
        is_default: bool,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            unit: unit.into(),
            color: color.into(),
            is_default,
        }
    }
}

/// Immutable catalog of metrics with unique ids.
///
/// Edits return a new registry; the receiver is left untouched.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct MetricRegistry {
    metrics: Vec<MetricDescriptor>,
}

impl MetricRegistry {
    pub fn new(metrics: Vec<MetricDescriptor>) -> RegistryResult<Self> {
        for (idx, metric) in metrics.iter().enumerate() {
            if metric.id.trim().is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if metrics[..idx].iter().any(|m| m.id == metric.id) {
                return Err(RegistryError::DuplicateId(metric.id.clone()));
            }
        }
        Ok(Self { metrics })
    }

    /// Rocket-flight channels shipped with the dashboard.
    pub fn flight_defaults() -> Self {
        Self {
            metrics: vec![
                MetricDescriptor::new("altitude", "Altitude", "m", "#3b82f6", true),
                MetricDescriptor::new("velocity", "Velocity", "m/s", "#10b981", true),
                MetricDescriptor::new("acceleration", "Acceleration", "m/s²", "#f59e0b", true),
                MetricDescriptor::new("pressure", "Dynamic Pressure (Q)", "kPa", "#8b5cf6", false),
                MetricDescriptor::new("temp_engine", "Engine Temp", "°C", "#ef4444", false),
                MetricDescriptor::new("vibration", "Vibration", "g", "#ec4899", false),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&MetricDescriptor> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricDescriptor> {
        self.metrics.iter()
    }

    pub fn as_slice(&self) -> &[MetricDescriptor] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn with_metric(&self, metric: MetricDescriptor) -> RegistryResult<Self> {
        let mut metrics = self.metrics.clone();
        metrics.push(metric);
        Self::new(metrics)
    }

    pub fn with_updated(&self, metric: MetricDescriptor) -> RegistryResult<Self> {
        let position = self
            .metrics
            .iter()
            .position(|m| m.id == metric.id)
            .ok_or_else(|| RegistryError::UnknownMetric(metric.id.clone()))?;
        let mut metrics = self.metrics.clone();
        metrics[position] = metric;
        Ok(Self { metrics })
    }

    pub fn without_metric(&self, id: &str) -> RegistryResult<Self> {
        if self.get(id).is_none() {
            return Err(RegistryError::UnknownMetric(id.to_string()));
        }
        let metrics = self.metrics.iter().filter(|m| m.id != id).cloned().collect();
        Ok(Self { metrics })
    }

    /// Metrics flagged as shown by default.
    pub fn defaults(&self) -> Self {
        Self {
            metrics: self.metrics.iter().filter(|m| m.is_default).cloned().collect(),
        }
    }

    /// Ordered subset for the given ids; unknown ids are skipped.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Self {
        let mut metrics: Vec<MetricDescriptor> = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(metric) = self.get(id.as_ref()) {
                if !metrics.iter().any(|m| m.id == metric.id) {
                    metrics.push(metric.clone());
                }
            }
        }
        Self { metrics }
    }
}

impl<'de> Deserialize<'de> for MetricRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let metrics = Vec::<MetricDescriptor>::deserialize(deserializer)?;
        MetricRegistry::new(metrics).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a MetricRegistry {
    type Item = &'a MetricDescriptor;
    type IntoIter = std::slice::Iter<'a, MetricDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.metrics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(id: &str) -> MetricDescriptor {
        MetricDescriptor::new(id, id.to_uppercase(), "u", "#000000", false)
    }

    #[test]
    fn registry_rejects_duplicate_ids() {
        let err = MetricRegistry::new(vec![metric("a"), metric("a")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId("a".into()));
    }

    #[test]
    fn registry_rejects_blank_ids() {
        assert_eq!(
            MetricRegistry::new(vec![metric(" ")]).unwrap_err(),
            RegistryError::EmptyId
        );
    }

    #[test]
    fn edits_leave_the_original_untouched() {
        let base = MetricRegistry::new(vec![metric("a"), metric("b")]).unwrap();
        let grown = base.with_metric(metric("c")).unwrap();
        let shrunk = base.without_metric("a").unwrap();

        let mut renamed = metric("b");
        renamed.display_name = "Bravo".into();
        let updated = base.with_updated(renamed).unwrap();

        assert_eq!(base.len(), 2);
        assert_eq!(grown.len(), 3);
        assert_eq!(shrunk.len(), 1);
        assert_eq!(updated.get("b").unwrap().display_name, "Bravo");
        assert_eq!(base.get("b").unwrap().display_name, "B");
    }

    #[test]
    fn edits_report_unknown_metrics() {
        let base = MetricRegistry::new(vec![metric("a")]).unwrap();
        assert_eq!(
            base.without_metric("z").unwrap_err(),
            RegistryError::UnknownMetric("z".into())
        );
        assert!(base.with_metric(metric("a")).is_err());
    }

    #[test]
    fn defaults_and_select_keep_registry_order() {
        let registry = MetricRegistry::flight_defaults();
        let defaults: Vec<_> = registry.defaults().iter().map(|m| m.id.clone()).collect();
        assert_eq!(defaults, vec!["altitude", "velocity", "acceleration"]);

        let selected = registry.select(&["temp_engine", "missing", "altitude", "altitude"]);
        let ids: Vec<_> = selected.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["temp_engine", "altitude"]);
    }

    #[test]
    fn registry_deserializes_with_validation() {
        let json = r#"[{"id":"a","displayName":"A","unit":"m"}]"#;
        let registry: MetricRegistry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.get("a").unwrap().is_default);

        let dup = r#"[{"id":"a","displayName":"A","unit":"m"},{"id":"a","displayName":"B","unit":"m"}]"#;
        assert!(serde_json::from_str::<MetricRegistry>(dup).is_err());
    }

    #[test]
    fn descriptor_uses_camel_case_keys() {
        let metric = MetricDescriptor::new("q", "Dynamic Pressure", "kPa", "#8b5cf6", true);
        let value = serde_json::to_value(&metric).unwrap();
        assert_eq!(value["displayName"], "Dynamic Pressure");
        assert_eq!(value["isDefault"], true);
        assert!(value.get("display_name").is_none());

        let snake = r##"{"id":"q","display_name":"Dynamic Pressure","unit":"kPa","color":"#8b5cf6","is_default":true}"##;
        assert_eq!(serde_json::from_str::<MetricDescriptor>(snake).unwrap(), metric);
    }
}
