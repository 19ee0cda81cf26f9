//! Metric value traits shared by the profile data structures, plus a plain
//! dense store used both as a reference implementation and as a bulk-load
//! source for the sparse representations.

pub mod accessor;
pub mod dense;

pub use accessor::{MetricAccessor, MetricSource};
pub use dense::DenseMetrics;
