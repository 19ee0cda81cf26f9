//! Traits at the seam between metric producers and metric storage.

/// A dense, read-only source of metric values, addressed by metric index.
///
/// This is the shape in which collaborators (samplers, profile readers) hand
/// over a fully materialized metric vector, typically so that it can be
/// bulk-loaded into a more compact representation.
pub trait MetricSource {
    /// Returns the number of metric slots exposed by this source.
    fn metric_count(&self) -> u32;

    /// Returns the value of the metric at `index`.
    ///
    /// `index` must be below [`metric_count`](MetricSource::metric_count).
    fn metric_value(&self, index: u32) -> f64;
}

impl MetricSource for [f64] {
    #[inline]
    fn metric_count(&self) -> u32 {
        self.len() as u32
    }

    #[inline]
    fn metric_value(&self, index: u32) -> f64 {
        self[index as usize]
    }
}

/// Random access to a single profile node's metric value vector.
///
/// The logical vector is conceptually unbounded; positions never written hold
/// an implicit zero. Implementations are free to store values sparsely, and
/// may defer making a mutation made through [`value_mut`] observable to
/// anything other than subsequent calls on the same accessor.
///
/// Accessors are single-owner and perform no internal synchronization;
/// combining per-thread instances must happen under external coordination.
///
/// [`value_mut`]: MetricAccessor::value_mut
pub trait MetricAccessor {
    /// Returns the logical value at `index` without changing any state,
    /// including any internal caching state.
    ///
    /// This is the only operation safe to call on an accessor considered
    /// logically read-only by its holder.
    fn value(&self, index: u32) -> f64;

    /// Returns a mutable handle to the logical value at `index`.
    ///
    /// The caller may read and write through the handle; the write becomes
    /// part of the logical vector immediately, as observed through this
    /// accessor.
    fn value_mut(&mut self, index: u32) -> &mut f64;

    /// Returns the smallest index `j >= index` that the accessor has
    /// materialized storage for (in particular, every nonzero position), or
    /// `None` if no such index exists.
    ///
    /// Lets consumers iterate the vector without touching positions that are
    /// zero by omission. A materialized position may still hold a zero that
    /// was explicitly stored; callers that need strictly nonzero values
    /// should check [`value`](MetricAccessor::value) at each visited index.
    fn next_index(&self, index: u32) -> Option<u32>;

    /// Returns true if every position of the logical vector is zero.
    fn is_empty(&self) -> bool;

    /// Renumbers the visible index space: a value addressed as `i` before
    /// the call is addressed as `i + delta` after it. Constant time; no
    /// stored data moves.
    ///
    /// The cumulative shift applied over the accessor's lifetime must stay
    /// within the index headroom documented by the implementation.
    fn shift_indices(&mut self, delta: i32);
}
