//! The leaf storage unit: a contiguous block of metric slots stored densely.

use std::ops::Range;

/// A maximal contiguous block of materialized metric slots.
///
/// A run covers the half-open interval `[start, start + values.len())` and
/// stores one value per covered position. `values` is never empty; individual
/// stored values may be zero (a slot that was explicitly written and later
/// zeroed stays materialized).
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// First covered position.
    start: u32,
    /// One value per position, `values[i]` belonging to `start + i`.
    values: Vec<f64>,
}

impl Run {
    /// Creates a run covering exactly `pos`.
    #[inline]
    pub fn singleton(pos: u32, value: f64) -> Run {
        Run {
            start: pos,
            values: vec![value],
        }
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Position one past the last covered slot.
    #[inline]
    pub fn end(&self) -> u32 {
        self.start + self.values.len() as u32
    }

    /// The covered interval `[start, end)`.
    #[inline]
    pub fn span(&self) -> Range<u32> {
        self.start..self.end()
    }

    /// Number of covered positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn contains(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Stored value at `pos`, which must be covered by this run.
    #[inline]
    pub fn value_at(&self, pos: u32) -> f64 {
        debug_assert!(self.contains(pos));
        self.values[(pos - self.start) as usize]
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn set_value_at(&mut self, pos: u32, value: f64) {
        debug_assert!(self.contains(pos));
        self.values[(pos - self.start) as usize] = value;
    }

    /// Absorbs `next`, which must begin exactly where this run ends.
    pub(crate) fn absorb_following(&mut self, next: Run) {
        debug_assert_eq!(next.start, self.end());
        self.values.extend(next.values);
    }

    /// Absorbs `prev`, which must end exactly where this run starts.
    pub(crate) fn absorb_preceding(&mut self, prev: Run) {
        debug_assert_eq!(prev.end(), self.start);
        let mut values = prev.values;
        values.append(&mut self.values);
        self.start = prev.start;
        self.values = values;
    }

    /// Coalesces `next` into this run if the two are exactly adjacent,
    /// otherwise hands both back unchanged. `next` must not start before
    /// this run ends.
    #[inline]
    pub fn coalesce(mut self, next: Run) -> Result<Run, (Run, Run)> {
        debug_assert!(next.start >= self.end());
        if next.start == self.end() {
            self.values.extend(next.values);
            Ok(self)
        } else {
            Err((self, next))
        }
    }
}
