//! Allocator instrumentation for per-sample memory accounting.
//!
//! There is no tracing garbage collector under this runtime, so heap traffic
//! is observed by interposing on the global allocator instead. Installing
//! the hook is opt-in, done by the embedding binary:
//!
//! ```ignore
//! use tachymeter::measurement::CountingAllocator;
//!
//! #[global_allocator]
//! static ALLOC: CountingAllocator = CountingAllocator::system();
//! ```
//!
//! Without the hook the counters never move and every sample records zero
//! bytes and zero allocations, which the data model permits.
//!
//! Counters are process-wide monotone totals; callers take a snapshot before
//! and after a timed region and subtract. Deallocations are deliberately not
//! tracked: the columns measure bytes *requested* and allocator *calls*, not
//! live heap.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static BYTES_ALLOCATED: AtomicU64 = AtomicU64::new(0);
static ALLOCATION_CALLS: AtomicU64 = AtomicU64::new(0);

/// Global allocator wrapper that counts bytes requested and allocation calls.
pub struct CountingAllocator<A = System> {
    inner: A,
}

impl CountingAllocator<System> {
    /// Counting wrapper around the system allocator.
    pub const fn system() -> Self {
        Self { inner: System }
    }
}

impl<A> CountingAllocator<A> {
    /// Wrap an arbitrary allocator.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for CountingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        BYTES_ALLOCATED.fetch_add(layout.size() as u64, Ordering::Relaxed);
        ALLOCATION_CALLS.fetch_add(1, Ordering::Relaxed);
        unsafe { self.inner.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        BYTES_ALLOCATED.fetch_add(layout.size() as u64, Ordering::Relaxed);
        ALLOCATION_CALLS.fetch_add(1, Ordering::Relaxed);
        unsafe { self.inner.alloc_zeroed(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        BYTES_ALLOCATED.fetch_add(new_size as u64, Ordering::Relaxed);
        ALLOCATION_CALLS.fetch_add(1, Ordering::Relaxed);
        unsafe { self.inner.realloc(ptr, layout, new_size) }
    }
}

/// A snapshot of the allocator counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocCounters {
    /// Total heap bytes requested since process start.
    pub bytes: u64,
    /// Total allocator operations since process start.
    pub calls: u64,
}

impl AllocCounters {
    /// Counters accumulated since an earlier snapshot.
    pub fn since(self, earlier: AllocCounters) -> AllocCounters {
        AllocCounters {
            bytes: self.bytes.saturating_sub(earlier.bytes),
            calls: self.calls.saturating_sub(earlier.calls),
        }
    }
}

/// Read the current allocator counters.
///
/// Zero for both fields when no [`CountingAllocator`] is installed.
#[inline]
pub fn counters() -> AllocCounters {
    AllocCounters {
        bytes: BYTES_ALLOCATED.load(Ordering::Relaxed),
        calls: ALLOCATION_CALLS.load(Ordering::Relaxed),
    }
}
