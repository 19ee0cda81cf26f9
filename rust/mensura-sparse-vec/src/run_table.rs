//! The ordered run store backing a sparse metric vector.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::run::Run;

/// An ordered collection of runs, pairwise non-overlapping and non-adjacent.
///
/// Runs are keyed by their interval start; containment lookup is a
/// predecessor search plus an explicit containment check, O(log R) in the
/// number of runs. Non-adjacency is a hard correctness invariant, not a
/// compaction nicety: a position query must resolve to at most one candidate
/// run, so two runs that touch are always merged into one at commit time.
///
/// Because the interval start is the lookup key, a merge that changes a run's
/// bounds never mutates a stored entry's key: the affected entries are
/// removed and the merged run is inserted once, under its final start.
#[derive(Clone, Default)]
pub struct RunTable {
    runs: BTreeMap<u32, Run>,
}

impl RunTable {
    pub fn new() -> RunTable {
        RunTable {
            runs: BTreeMap::new(),
        }
    }

    /// Builds a table from runs with strictly ascending, possibly adjacent
    /// intervals, merging adjacent runs as they arrive.
    pub(crate) fn from_ascending_runs(runs: impl Iterator<Item = Run>) -> RunTable {
        let mut table = BTreeMap::new();
        for run in runs.coalesce(|prev, next| prev.coalesce(next)) {
            let _prev = table.insert(run.start(), run);
            debug_assert!(_prev.is_none(), "run starts must be strictly ascending");
        }
        let table = RunTable { runs: table };
        #[cfg(debug_assertions)]
        table.check_invariants();
        table
    }

    /// Returns the run containing `pos`, if any.
    pub fn find(&self, pos: u32) -> Option<&Run> {
        self.runs
            .range(..=pos)
            .next_back()
            .map(|(_, run)| run)
            .filter(|run| run.contains(pos))
    }

    fn find_mut(&mut self, pos: u32) -> Option<&mut Run> {
        self.runs
            .range_mut(..=pos)
            .next_back()
            .map(|(_, run)| run)
            .filter(|run| run.contains(pos))
    }

    /// Returns the stored value at `pos`, or zero if no run covers it.
    #[inline]
    pub fn value_at(&self, pos: u32) -> f64 {
        self.find(pos).map_or(0.0, |run| run.value_at(pos))
    }

    /// Returns the smallest covered position at or after `pos`: `pos` itself
    /// if some run contains it, otherwise the start of the first run
    /// beginning after it.
    pub fn next_position(&self, pos: u32) -> Option<u32> {
        if self.find(pos).is_some() {
            return Some(pos);
        }
        self.runs.range(pos..).next().map(|(&start, _)| start)
    }

    /// Number of runs in the table.
    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Iterates the runs in ascending interval order.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.values()
    }

    /// Commits `value` at `pos`. Invoked only on cache eviction.
    ///
    /// If a run already covers `pos`, its stored value is overwritten in
    /// place (the interval, and thus the key, is unchanged). An uncovered
    /// zero commits as a no-op: absence already represents it. Otherwise a
    /// singleton run materializes and absorbs the immediately following and
    /// preceding runs when they touch it.
    pub(crate) fn commit(&mut self, pos: u32, value: f64) {
        if let Some(run) = self.find_mut(pos) {
            run.set_value_at(pos, value);
            return;
        }
        if value == 0.0 {
            return;
        }
        let mut run = Run::singleton(pos, value);
        if pos < u32::MAX {
            if let Some(next) = self.runs.remove(&(pos + 1)) {
                run.absorb_following(next);
            }
        }
        let preceding = match self.runs.range(..pos).next_back() {
            Some((&start, prev)) if prev.end() == pos => Some(start),
            _ => None,
        };
        if let Some(start) = preceding {
            if let Some(prev) = self.runs.remove(&start) {
                run.absorb_preceding(prev);
            }
        }
        self.runs.insert(run.start(), run);
        #[cfg(debug_assertions)]
        self.check_invariants();
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        let mut prev_end: Option<u32> = None;
        for (&start, run) in &self.runs {
            assert_eq!(start, run.start());
            assert!(!run.values().is_empty());
            if let Some(end) = prev_end {
                assert!(end < start, "runs must neither overlap nor touch");
            }
            prev_end = Some(run.end());
        }
    }
}

impl fmt::Debug for RunTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for run in self.runs.values() {
            map.entry(&run.span(), &run.values());
        }
        map.finish()
    }
}
