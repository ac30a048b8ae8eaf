/// Population statistics for one metric's readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl MetricStats {
    /// Absolute z-score. A zero deviation is replaced by 1 so constant
    /// series score 0 instead of dividing by zero.
    pub fn z_score(&self, value: f64) -> f64 {
        let divisor = if self.std_dev == 0.0 { 1.0 } else { self.std_dev };
        (value - self.mean).abs() / divisor
    }
}

pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Standard deviation dividing by `n`, not `n - 1`.
    pub fn population_std_dev(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mean = Self::mean(samples);
        let sum_sq: f64 = samples.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    pub fn describe(samples: &[f64]) -> Option<MetricStats> {
        if samples.is_empty() {
            return None;
        }
        Some(MetricStats {
            count: samples.len(),
            mean: Self::mean(samples),
            std_dev: Self::population_std_dev(samples),
        })
    }

    /// `(min, max)` of the samples, `None` when empty.
    pub fn min_max(samples: &[f64]) -> Option<(f64, f64)> {
        let mut iter = samples.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_yields_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::population_std_dev(&[]), 0.0);
        assert!(StatsHelper::describe(&[]).is_none());
        assert!(StatsHelper::min_max(&[]).is_none());
    }

    #[test]
    fn std_dev_divides_by_count() {
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(StatsHelper::mean(&samples), 5.0);
        assert_eq!(StatsHelper::population_std_dev(&samples), 2.0);
    }

    #[test]
    fn constant_samples_score_zero() {
        let stats = StatsHelper::describe(&[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.z_score(3.0), 0.0);
    }

    #[test]
    fn min_max_handles_single_value() {
        assert_eq!(StatsHelper::min_max(&[4.0]), Some((4.0, 4.0)));
        assert_eq!(StatsHelper::min_max(&[3.0, -1.0, 8.0]), Some((-1.0, 8.0)));
    }
}
