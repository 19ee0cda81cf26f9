//! Interval-coalescing sparse storage for one profile node's metric vector.
//!
//! A deep calling-context tree holds one metric vector per node, and a node
//! typically has nonzero values for only a handful of the registered metrics.
//! [`SparseMetricVector`] stores only the nonzero regions, as dense runs that
//! merge automatically when writes make them adjacent, and front-ends every
//! access with a single-slot write-back cache so that the sequential-fill
//! pattern used while accumulating samples stays O(1) per touch.

pub mod run;
pub mod run_table;
pub mod sparse_vector;

pub use sparse_vector::SparseMetricVector;
