//! The interval-coalescing sparse metric vector.

use std::fmt;

use mensura_metric_data::{MetricAccessor, MetricSource};

use crate::run::Run;
use crate::run_table::RunTable;

/// Initial rebasing offset: the middle of the index space, so the visible
/// range can later be renumbered in either direction using only unsigned
/// positions.
const BASE_SHIFT: u32 = u32::MAX / 2;

/// The single write-back slot holding the most recently touched position.
#[derive(Debug, Clone, Copy)]
struct CacheSlot {
    /// Internal (shifted) position of the cached value.
    pos: u32,
    value: f64,
}

impl CacheSlot {
    /// Position marker for a slot that has never been loaded. Unreachable
    /// through the documented index domain.
    const VACANT: u32 = u32::MAX;

    #[inline]
    fn vacant() -> CacheSlot {
        CacheSlot {
            pos: Self::VACANT,
            value: 0.0,
        }
    }
}

/// A sparse `f64` vector tuned for calling-context metric accumulation.
///
/// Overview
/// - Nonzero regions live as dense [`Run`]s in a [`RunTable`]; every position
///   not covered by a run is an implicit zero.
/// - A single-slot write-back cache front-ends every access: repeated reads
///   and writes at one index cost O(1), and the table is consulted only when
///   the touched index changes (evict + lookup, O(log R) plus the length of
///   any merged run).
/// - An additive shift rebases the visible index space in O(1) without
///   moving stored data.
///
/// Contracts
/// - Visible indices, adjusted by the cumulative applied shift, must stay
///   within the reserved half-range headroom (about `u32::MAX / 2` in either
///   direction). Debug assertions enforce this; release builds do not.
/// - Single-owner, single-writer; no internal synchronization. Combining
///   per-thread vectors must happen under external coordination.
/// - Zeroing a position inside a materialized run keeps the run intact: the
///   position still appears in [`next_index`], reads as zero, and its
///   storage is not reclaimed.
/// - `Clone` deep-copies the entire state, including a pending un-flushed
///   write, so a clone always observes the same logical values as its
///   source.
///
/// [`next_index`]: MetricAccessor::next_index
#[derive(Clone)]
pub struct SparseMetricVector {
    table: RunTable,
    slot: CacheSlot,
    /// Nonzero values materialized in the table, excluding the checked-out
    /// slot position.
    nonzero: u32,
    /// Added to visible indices to produce table positions.
    shift: u32,
}

impl SparseMetricVector {
    pub fn new() -> SparseMetricVector {
        SparseMetricVector {
            table: RunTable::new(),
            slot: CacheSlot::vacant(),
            nonzero: 0,
            shift: BASE_SHIFT,
        }
    }

    /// Bulk-loads a dense source by writing every slot through the accessor,
    /// producing the same state as that many sequential writes.
    pub fn from_source<S: MetricSource + ?Sized>(source: &S) -> SparseMetricVector {
        let mut vector = SparseMetricVector::new();
        for index in 0..source.metric_count() {
            *vector.value_mut(index) = source.metric_value(index);
        }
        vector
    }

    /// Builds a vector from `(index, value)` pairs with strictly ascending
    /// indices, materializing runs directly instead of going through the
    /// write-back cache. Zero values are skipped and stay implicit.
    pub fn from_sorted_pairs(pairs: impl IntoIterator<Item = (u32, f64)>) -> SparseMetricVector {
        let mut nonzero = 0u32;
        let singletons = pairs
            .into_iter()
            .filter(|&(_, value)| value != 0.0)
            .map(|(index, value)| {
                nonzero += 1;
                Run::singleton(index + BASE_SHIFT, value)
            });
        let table = RunTable::from_ascending_runs(singletons);
        SparseMetricVector {
            table,
            slot: CacheSlot::vacant(),
            nonzero,
            shift: BASE_SHIFT,
        }
    }

    /// Exact count of nonzero values currently in the vector, whether
    /// materialized or pending in the write-back slot.
    pub fn count_nonzero(&self) -> u32 {
        self.nonzero + (self.slot.value != 0.0) as u32
    }

    /// Number of materialized runs; a diagnostic for compaction behavior.
    ///
    /// A pending cached write at an uncovered position is not reflected
    /// until it is evicted into the table.
    pub fn run_count(&self) -> usize {
        self.table.run_count()
    }

    /// Iterates `(index, value)` over the nonzero positions in ascending
    /// index order, skipping materialized zeros.
    pub fn nonzero(&self) -> Nonzero<'_> {
        Nonzero {
            vector: self,
            next: self.next_index(0),
        }
    }

    /// Maps a visible index to its internal table position.
    #[inline]
    fn rebase(&self, index: u32) -> u32 {
        debug_assert!(
            (index as u64 + self.shift as u64) < u32::MAX as u64,
            "metric index {index} exceeds the shift headroom"
        );
        index.wrapping_add(self.shift)
    }

    /// Evicts the slot into the run table.
    fn flush(&mut self) {
        if self.slot.pos == CacheSlot::VACANT {
            return;
        }
        self.nonzero += (self.slot.value != 0.0) as u32;
        self.table.commit(self.slot.pos, self.slot.value);
    }
}

impl Default for SparseMetricVector {
    fn default() -> SparseMetricVector {
        SparseMetricVector::new()
    }
}

impl MetricAccessor for SparseMetricVector {
    fn value(&self, index: u32) -> f64 {
        let pos = self.rebase(index);
        if self.slot.pos == pos {
            self.slot.value
        } else {
            self.table.value_at(pos)
        }
    }

    fn value_mut(&mut self, index: u32) -> &mut f64 {
        let pos = self.rebase(index);
        if self.slot.pos != pos {
            self.flush();
            let value = self.table.value_at(pos);
            if value != 0.0 {
                // The position is checked out of the table's accounting
                // until the next eviction.
                self.nonzero -= 1;
            }
            self.slot = CacheSlot { pos, value };
        }
        &mut self.slot.value
    }

    fn next_index(&self, index: u32) -> Option<u32> {
        let pos = self.rebase(index);
        let pending = (self.slot.value != 0.0 && self.slot.pos >= pos).then_some(self.slot.pos);
        let stored = self.table.next_position(pos);
        pending
            .into_iter()
            .chain(stored)
            .min()
            .map(|found| found - self.shift)
    }

    fn is_empty(&self) -> bool {
        self.nonzero == 0 && self.slot.value == 0.0
    }

    fn shift_indices(&mut self, delta: i32) {
        let shifted = self.shift as i64 - delta as i64;
        debug_assert!(
            u32::try_from(shifted).is_ok(),
            "cumulative index shift out of range"
        );
        self.shift = shifted as u32;
    }
}

impl fmt::Debug for SparseMetricVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct RebasedRuns<'a>(&'a SparseMetricVector);

        impl fmt::Debug for RebasedRuns<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let shift = self.0.shift;
                let mut map = f.debug_map();
                for run in self.0.table.runs() {
                    let span = run.span();
                    map.entry(
                        &(span.start.wrapping_sub(shift)..span.end.wrapping_sub(shift)),
                        &run.values(),
                    );
                }
                map.finish()
            }
        }

        let slot = (self.slot.pos != CacheSlot::VACANT)
            .then(|| (self.slot.pos.wrapping_sub(self.shift), self.slot.value));
        f.debug_struct("SparseMetricVector")
            .field("slot", &slot)
            .field("runs", &RebasedRuns(self))
            .field("nonzero", &self.nonzero)
            .finish()
    }
}

/// Iterator over the nonzero `(index, value)` pairs of a vector.
pub struct Nonzero<'a> {
    vector: &'a SparseMetricVector,
    next: Option<u32>,
}

impl Iterator for Nonzero<'_> {
    type Item = (u32, f64);

    fn next(&mut self) -> Option<(u32, f64)> {
        while let Some(index) = self.next {
            self.next = index
                .checked_add(1)
                .and_then(|after| self.vector.next_index(after));
            let value = self.vector.value(index);
            if value != 0.0 {
                return Some((index, value));
            }
        }
        None
    }
}
