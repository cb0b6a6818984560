//! Running statistics over trial outcomes.

use serde::{Deserialize, Serialize};

/// Mean, variance and range of a scalar sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Population variance (σ²)
    pub variance: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Number of samples
    pub sample_count: u64,
}

impl Default for ScalarStats {
    fn default() -> Self {
        Self::empty()
    }
}

impl ScalarStats {
    /// Stats of a single value.
    #[must_use]
    pub const fn from_value(value: f64) -> Self {
        Self {
            mean: value,
            variance: 0.0,
            min: value,
            max: value,
            sample_count: 1,
        }
    }

    /// Stats of nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            mean: 0.0,
            variance: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sample_count: 0,
        }
    }

    /// Combines two samples (Chan et al. parallel variance).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn merge(a: &Self, b: &Self) -> Self {
        if a.sample_count == 0 {
            return *b;
        }
        if b.sample_count == 0 {
            return *a;
        }

        let n_a = a.sample_count as f64;
        let n_b = b.sample_count as f64;
        let n_total = n_a + n_b;

        let delta = b.mean - a.mean;
        let mean = a.mean + delta * (n_b / n_total);
        let variance =
            (a.variance * n_a + b.variance * n_b + delta * delta * n_a * n_b / n_total) / n_total;

        Self {
            mean,
            variance,
            min: a.min.min(b.min),
            max: a.max.max(b.max),
            sample_count: a.sample_count + b.sample_count,
        }
    }

    /// Folds a sequence of values.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        values
            .into_iter()
            .fold(Self::empty(), |acc, v| Self::merge(&acc, &Self::from_value(v)))
    }

    /// Standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Whether no samples were seen.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_is_identity() {
        let s = ScalarStats::from_value(3.0);
        assert_eq!(ScalarStats::merge(&ScalarStats::empty(), &s), s);
        assert_eq!(ScalarStats::merge(&s, &ScalarStats::empty()), s);
        assert!(ScalarStats::default().is_empty());
    }

    #[test]
    fn matches_two_pass_formulas() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = ScalarStats::from_values(values);
        assert_eq!(stats.sample_count, 8);
        assert!(close(stats.mean, 5.0));
        assert!(close(stats.variance, 4.0));
        assert!(close(stats.std_dev(), 2.0));
        assert!(close(stats.min, 2.0));
        assert!(close(stats.max, 9.0));
    }

    #[test]
    fn merge_is_order_independent() {
        let left = ScalarStats::from_values([1.0, 2.0, 3.0]);
        let right = ScalarStats::from_values([10.0, 20.0]);
        let ab = ScalarStats::merge(&left, &right);
        let ba = ScalarStats::merge(&right, &left);
        assert!(close(ab.mean, ba.mean));
        assert!(close(ab.variance, ba.variance));
        assert_eq!(ab.sample_count, 5);
    }
}
