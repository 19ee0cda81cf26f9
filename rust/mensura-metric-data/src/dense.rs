//! A plain dense metric vector.

use crate::accessor::MetricSource;

/// A growable dense vector of metric values.
///
/// `DenseMetrics` is the straightforward representation: one `f64` per metric
/// slot, zero-filled. It serves as a [`MetricSource`] for bulk-loading the
/// compact representations, and as a reference model in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseMetrics {
    values: Vec<f64>,
}

impl DenseMetrics {
    /// Creates an empty store with no metric slots.
    pub fn new() -> DenseMetrics {
        DenseMetrics { values: Vec::new() }
    }

    /// Creates a store with `count` zero-valued metric slots.
    pub fn with_count(count: u32) -> DenseMetrics {
        DenseMetrics {
            values: vec![0.0; count as usize],
        }
    }

    /// Creates a store over the given values.
    pub fn from_values(values: Vec<f64>) -> DenseMetrics {
        DenseMetrics { values }
    }

    /// Returns the value at `index`, or zero beyond the last slot.
    #[inline]
    pub fn value(&self, index: u32) -> f64 {
        self.values.get(index as usize).copied().unwrap_or(0.0)
    }

    /// Sets the value at `index`, growing the store with zero slots as
    /// needed.
    pub fn set(&mut self, index: u32, value: f64) {
        let index = index as usize;
        if index >= self.values.len() {
            self.values.resize(index + 1, 0.0);
        }
        self.values[index] = value;
    }

    /// Appends a metric slot holding `value`.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Returns the stored values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl MetricSource for DenseMetrics {
    #[inline]
    fn metric_count(&self) -> u32 {
        self.values.len() as u32
    }

    #[inline]
    fn metric_value(&self, index: u32) -> f64 {
        self.values[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use crate::accessor::MetricSource;
    use crate::dense::DenseMetrics;

    #[test]
    fn test_set_grows_with_zero_fill() {
        let mut metrics = DenseMetrics::new();
        metrics.set(4, 2.5);
        assert_eq!(metrics.metric_count(), 5);
        assert_eq!(metrics.as_slice(), &[0.0, 0.0, 0.0, 0.0, 2.5]);

        metrics.set(1, -1.0);
        assert_eq!(metrics.metric_count(), 5);
        assert_eq!(metrics.value(1), -1.0);
    }

    #[test]
    fn test_value_beyond_end_is_zero() {
        let metrics = DenseMetrics::from_values(vec![1.0, 2.0]);
        assert_eq!(metrics.value(1), 2.0);
        assert_eq!(metrics.value(2), 0.0);
        assert_eq!(metrics.value(1000), 0.0);
    }

    #[test]
    fn test_slice_as_source() {
        let values = [0.0, 3.0, 0.0];
        let source: &[f64] = &values;
        assert_eq!(source.metric_count(), 3);
        assert_eq!(source.metric_value(1), 3.0);
    }

    #[test]
    fn test_with_count() {
        let metrics = DenseMetrics::with_count(3);
        assert_eq!(metrics.metric_count(), 3);
        assert!(metrics.as_slice().iter().all(|&v| v == 0.0));
    }
}
