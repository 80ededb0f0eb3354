//! Measurement infrastructure: the monotonic clock, its resolution probe,
//! and the allocator counting hook.
//!
//! Timing uses the OS monotonic clock via `std::time::Instant`, read as
//! integer nanoseconds from a process-wide epoch. The probe in
//! [`clock::resolution`] estimates the smallest interval the clock can
//! actually observe; the engine uses that estimate to decide whether an
//! expression is measurable one evaluation at a time.
//!
//! Memory accounting is opt-in: binaries that want per-sample byte and
//! allocation counts install [`CountingAllocator`] as their
//! `#[global_allocator]`. See the [`alloc`] module docs.

pub mod alloc;
pub mod clock;

pub use alloc::{counters, AllocCounters, CountingAllocator};
pub use clock::{monotonic_ns, resolution, DEFAULT_RESOLUTION_TRIALS};
