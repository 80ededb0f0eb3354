//! Columnar storage for per-sample observations.

use serde::{Deserialize, Serialize};

/// One sample's observations, appended to a [`SampleStore`] as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    /// Inner loop count used for this sample (>= 1).
    pub evaluations: f64,
    /// Total wall time for this sample, nanoseconds.
    pub elapsed_ns: f64,
    /// Portion of `elapsed_ns` spent in runtime-managed reclamation.
    /// Always zero under a non-tracing allocator.
    pub gc_ns: f64,
    /// Total heap bytes requested during this sample.
    pub bytes_allocated: u64,
    /// Allocator operations during this sample.
    pub allocations: u64,
}

/// Append-only columnar record of benchmark samples.
///
/// Five parallel columns of equal length, one element per sample. Rows are
/// appended through [`push`](SampleStore::push), which extends all five
/// columns together; at every externally observable point the columns share
/// a common length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStore {
    evaluations: Vec<f64>,
    elapsed_ns: Vec<f64>,
    gc_ns: Vec<f64>,
    bytes_allocated: Vec<u64>,
    allocations: Vec<u64>,
}

impl SampleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` samples per column.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            evaluations: Vec::with_capacity(capacity),
            elapsed_ns: Vec::with_capacity(capacity),
            gc_ns: Vec::with_capacity(capacity),
            bytes_allocated: Vec::with_capacity(capacity),
            allocations: Vec::with_capacity(capacity),
        }
    }

    /// Number of samples recorded.
    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    /// Whether the store holds no samples.
    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    /// Reserve room for `additional` further samples in every column.
    pub fn reserve(&mut self, additional: usize) {
        self.evaluations.reserve(additional);
        self.elapsed_ns.reserve(additional);
        self.gc_ns.reserve(additional);
        self.bytes_allocated.reserve(additional);
        self.allocations.reserve(additional);
    }

    /// Append one sample, extending all five columns together.
    pub fn push(&mut self, row: SampleRow) {
        debug_assert!(row.evaluations >= 1.0, "evaluations must be >= 1");
        debug_assert!(
            row.gc_ns >= 0.0 && row.gc_ns <= row.elapsed_ns,
            "gc time must lie within [0, elapsed]"
        );
        self.evaluations.push(row.evaluations);
        self.elapsed_ns.push(row.elapsed_ns);
        self.gc_ns.push(row.gc_ns);
        self.bytes_allocated.push(row.bytes_allocated);
        self.allocations.push(row.allocations);
    }

    /// Discard every sample, leaving capacity in place.
    pub fn clear(&mut self) {
        self.evaluations.clear();
        self.elapsed_ns.clear();
        self.gc_ns.clear();
        self.bytes_allocated.clear();
        self.allocations.clear();
    }

    /// Inner loop counts, one per sample.
    pub fn evaluations(&self) -> &[f64] {
        &self.evaluations
    }

    /// Wall times in nanoseconds, one per sample.
    pub fn elapsed_ns(&self) -> &[f64] {
        &self.elapsed_ns
    }

    /// Reclamation times in nanoseconds, one per sample.
    pub fn gc_ns(&self) -> &[f64] {
        &self.gc_ns
    }

    /// Heap bytes requested, one per sample.
    pub fn bytes_allocated(&self) -> &[u64] {
        &self.bytes_allocated
    }

    /// Allocator operation counts, one per sample.
    pub fn allocations(&self) -> &[u64] {
        &self.allocations
    }

    /// The `index`th sample as a row, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<SampleRow> {
        if index >= self.len() {
            return None;
        }
        Some(SampleRow {
            evaluations: self.evaluations[index],
            elapsed_ns: self.elapsed_ns[index],
            gc_ns: self.gc_ns[index],
            bytes_allocated: self.bytes_allocated[index],
            allocations: self.allocations[index],
        })
    }

    /// Iterate over samples in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = SampleRow> + '_ {
        (0..self.len()).map(|i| SampleRow {
            evaluations: self.evaluations[i],
            elapsed_ns: self.elapsed_ns[i],
            gc_ns: self.gc_ns[i],
            bytes_allocated: self.bytes_allocated[i],
            allocations: self.allocations[i],
        })
    }
}
