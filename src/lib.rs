//! # tachymeter
//!
//! Adaptive micro-benchmarking: estimate the per-evaluation wall-clock cost
//! of an expression, from a few nanoseconds to many seconds, within a fixed
//! time budget.
//!
//! The engine decides how to measure based on what it observes:
//! - An expression slower than ~1000 clock ticks per evaluation is measured
//!   directly, one evaluation per sample, and summarized by mean and
//!   standard error.
//! - A faster expression cannot register against clock granularity, so the
//!   engine folds geometrically growing runs of evaluations into each
//!   sample and reports the slope of an ordinary-least-squares fit of total
//!   time against evaluations.
//!
//! Either way the first, potentially warmup-biased, measurement is
//! discarded as soon as the budget allows a replacement, and intervals are
//! widened to six standard errors because successive samples are not
//! independent.
//!
//! ## Common Pitfall: Work the Optimizer Can Delete
//!
//! The core expression's result is routed through `std::hint::black_box`,
//! but work that never reaches the returned value can still be eliminated.
//! Return the value you want costed:
//!
//! ```ignore
//! // WRONG - the sum is dead and may be optimized away
//! let mut r = tachymeter::routine(|| { v.iter().sum::<u64>(); });
//!
//! // CORRECT - the sum is the routine's result
//! let mut r = tachymeter::routine(|| v.iter().sum::<u64>());
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use tachymeter::{bench, Executor, routine};
//!
//! // One-liner with defaults (100 samples, 10s budget):
//! let results = bench!((0..1000u64).sum::<u64>())?;
//! println!("{}", tachymeter::output::format_results(&results));
//!
//! // Full control:
//! let mut r = routine(|| (0..1000u64).sum::<u64>());
//! let results = Executor::new()
//!     .samples(200)
//!     .budget(std::time::Duration::from_secs(2))
//!     .run(&mut r)?;
//! let summary = results.summary()?;
//! println!("{} ns/eval", summary.elapsed_ns.center);
//! ```
//!
//! Per-sample byte and allocation counts additionally require installing
//! the counting allocator in the embedding binary; see
//! [`measurement::CountingAllocator`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod benchmarkable;
mod config;
mod engine;
mod error;
mod results;
mod samples;

pub mod data;
pub mod environment;
pub mod measurement;
pub mod output;
pub mod stats;

pub use benchmarkable::{routine, Benchmarkable, Plan, Routine};
pub use config::Config;
pub use engine::Executor;
pub use error::Error;
pub use results::{Estimate, Results, Summary, CI_SIGMA};
pub use samples::{SampleRow, SampleStore};

pub use environment::Environment;

/// Define a named benchmarkable from setup, core, and teardown closures.
///
/// Expands to a function returning an opaque [`Benchmarkable`]; the core
/// closure receives `&mut` access to whatever setup produced.
///
/// # Example
/// ```ignore
/// use tachymeter::{benchmark, Executor};
///
/// benchmark!(sum_sorted,
///     setup: || { let mut v: Vec<u64> = (0..1000).rev().collect(); v.sort(); v },
///     core: |v: &mut Vec<u64>| v.iter().sum::<u64>(),
///     teardown: |_| (),
/// );
///
/// let results = Executor::new().run(&mut sum_sorted())?;
/// ```
#[macro_export]
macro_rules! benchmark {
    ($name:ident,
     setup: $setup:expr,
     core: $core:expr,
     teardown: $teardown:expr $(,)?) => {
        fn $name() -> impl $crate::Benchmarkable {
            $crate::Routine::new($setup, $core, $teardown)
        }
    };
}

/// Benchmark a single expression with default configuration.
///
/// Wraps the expression in a routine with empty setup and teardown and runs
/// it immediately, yielding `Result<Results, Error>`.
///
/// # Example
/// ```ignore
/// let results = tachymeter::bench!([1u8; 64].iter().map(|&b| b as u64).sum::<u64>())?;
/// ```
#[macro_export]
macro_rules! bench {
    ($expr:expr) => {{
        let mut __routine = $crate::routine(|| $expr);
        $crate::Executor::new().run(&mut __routine)
    }};
}
