//! The benchmarkable contract and the closure-based routine wrapper.

use std::hint::black_box;

use crate::error::Error;
use crate::measurement::{alloc, clock};
use crate::samples::{SampleRow, SampleStore};

/// One invocation's execution plan: how many back-to-back evaluations are
/// folded into each sample, and how many samples to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Evaluations folded into each timed sample (>= 1).
    pub evaluations: u64,
    /// Samples to record in this invocation.
    pub samples: usize,
}

impl Plan {
    /// Build a plan.
    pub fn new(evaluations: u64, samples: usize) -> Self {
        debug_assert!(evaluations >= 1, "a sample must contain at least one evaluation");
        Self {
            evaluations,
            samples,
        }
    }
}

/// An opaque callable the engine can drive.
///
/// One invocation must: run any setup once; record `plan.samples` samples,
/// each timing `plan.evaluations` evaluations of the core expression between
/// a pair of clock and allocator-counter snapshots; run any teardown once.
/// Each sample is appended to `store` as one row.
///
/// Implementations must keep the hot path free of allocations beyond those
/// of the expression itself, and must route the expression call through a
/// non-inlinable barrier so the optimizer cannot fold it into the timing
/// instrumentation; [`Routine`] does both.
///
/// A failing setup or core expression is reported through the `Result`; the
/// engine propagates it and discards the store.
pub trait Benchmarkable {
    /// Execute one plan against the store.
    fn run(&mut self, store: &mut SampleStore, plan: Plan) -> Result<(), Error>;
}

/// Call barrier for the core expression.
///
/// Marked non-inlinable so the optimizer cannot move the expression body
/// across the timing snapshots or delete it outright. Monomorphization keeps
/// the call concretely typed; there is no dynamic dispatch in the loop.
#[inline(never)]
fn evaluate<S, T, F>(core: &mut F, state: &mut S) -> T
where
    F: FnMut(&mut S) -> T,
{
    core(state)
}

/// A [`Benchmarkable`] assembled from setup, core, and teardown closures.
///
/// `setup` runs once per invocation and produces the state the core
/// expression works on; `teardown` consumes that state after the last
/// sample. The core's result is passed to `std::hint::black_box` every
/// evaluation so its computation cannot be discarded.
///
/// ```ignore
/// use tachymeter::{Executor, Routine};
///
/// let mut routine = Routine::new(
///     || vec![3u64, 1, 2],
///     |v: &mut Vec<u64>| v.iter().sum::<u64>(),
///     |_| (),
/// );
/// let results = Executor::new().run(&mut routine)?;
/// ```
#[derive(Debug, Clone)]
pub struct Routine<Setup, Core, Teardown> {
    setup: Setup,
    core: Core,
    teardown: Teardown,
}

impl<Setup, Core, Teardown> Routine<Setup, Core, Teardown> {
    /// Assemble a routine from its three closures.
    pub fn new(setup: Setup, core: Core, teardown: Teardown) -> Self {
        Self {
            setup,
            core,
            teardown,
        }
    }
}

impl<S, T, Setup, Core, Teardown> Benchmarkable for Routine<Setup, Core, Teardown>
where
    Setup: FnMut() -> S,
    Core: FnMut(&mut S) -> T,
    Teardown: FnMut(S),
{
    fn run(&mut self, store: &mut SampleStore, plan: Plan) -> Result<(), Error> {
        let mut state = (self.setup)();

        // Grow the store up front; pushes after each sample then stay free
        // of reallocation, and in any case land outside the snapshot pairs.
        store.reserve(plan.samples);

        for _ in 0..plan.samples {
            let alloc_before = alloc::counters();
            let start = clock::monotonic_ns();
            for _ in 0..plan.evaluations {
                black_box(evaluate(&mut self.core, &mut state));
            }
            let elapsed = clock::monotonic_ns().saturating_sub(start);
            let traffic = alloc::counters().since(alloc_before);

            store.push(SampleRow {
                evaluations: plan.evaluations as f64,
                elapsed_ns: elapsed as f64,
                // No tracing collector under this runtime; the column is
                // kept so summaries and persisted formats stay uniform.
                gc_ns: 0.0,
                bytes_allocated: traffic.bytes,
                allocations: traffic.calls,
            });
        }

        (self.teardown)(state);
        Ok(())
    }
}

/// Wrap a bare expression closure into a routine with empty setup and
/// teardown.
pub fn routine<T, F>(
    mut core: F,
) -> Routine<impl FnMut(), impl FnMut(&mut ()) -> T, impl FnMut(())>
where
    F: FnMut() -> T,
{
    Routine::new(|| (), move |_: &mut ()| core(), |_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_records_planned_shape() {
        let mut store = SampleStore::new();
        let mut r = routine(|| 2u64 + 2);

        r.run(&mut store, Plan::new(4, 3)).unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.evaluations().iter().all(|&e| e == 4.0));
        assert!(store.elapsed_ns().iter().all(|&t| t >= 0.0));
    }

    #[test]
    fn test_setup_and_teardown_run_once_per_invocation() {
        use std::cell::Cell;

        let setups = Cell::new(0u32);
        let teardowns = Cell::new(0u32);
        let mut store = SampleStore::new();

        let mut r = Routine::new(
            || {
                setups.set(setups.get() + 1);
                0u64
            },
            |acc: &mut u64| {
                *acc += 1;
                *acc
            },
            |_| teardowns.set(teardowns.get() + 1),
        );

        r.run(&mut store, Plan::new(2, 5)).unwrap();
        assert_eq!(setups.get(), 1);
        assert_eq!(teardowns.get(), 1);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_state_persists_across_samples() {
        let mut store = SampleStore::new();
        let mut total = 0u64;
        {
            let mut r = Routine::new(
                || 0u64,
                |acc: &mut u64| {
                    *acc += 1;
                    *acc
                },
                |acc| total = acc,
            );
            r.run(&mut store, Plan::new(3, 4)).unwrap();
        }
        // 4 samples x 3 evaluations against one state instance.
        assert_eq!(total, 12);
    }

    #[test]
    fn test_appends_to_existing_store() {
        let mut store = SampleStore::new();
        let mut r = routine(|| 1u8);

        r.run(&mut store, Plan::new(1, 1)).unwrap();
        r.run(&mut store, Plan::new(2, 2)).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.evaluations(), &[1.0, 2.0, 2.0]);
    }
}
