//! Immutable benchmark outcomes and their derived summaries.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::samples::SampleStore;
use crate::stats;

/// Half-width multiplier for confidence intervals, in standard errors.
///
/// Successive samples carry residual serial correlation, so the usual
/// ~2-sigma interval under-covers. Six standard errors compensates for the
/// anti-conservative nominal coverage.
pub const CI_SIGMA: f64 = 6.0;

/// The immutable outcome of one engine run.
///
/// Produced exactly once per [`Executor::run`](crate::Executor::run); the
/// sample store is moved in and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    /// True iff the first, potentially compilation- or cache-warm-biased,
    /// sample was discarded before any retained sample was recorded.
    pub precompiled: bool,
    /// True iff more than one retained sample exists.
    pub multiple_samples: bool,
    /// True iff the geometric search ran; equivalently, some sample folds
    /// more than one evaluation.
    pub search_performed: bool,
    /// The retained samples.
    pub samples: SampleStore,
    /// Wall-clock seconds consumed by the run, end to end.
    pub time_used: f64,
}

impl Results {
    /// Derive a [`Summary`] from the retained samples.
    ///
    /// # Errors
    ///
    /// `Error::InsufficientData` when no samples were retained. The engine
    /// never produces such a `Results`; this arises only for hand-built or
    /// deserialized values.
    pub fn summary(&self) -> Result<Summary, Error> {
        Summary::from_results(self)
    }
}

/// A center value with optional interval bounds.
///
/// Bounds are absent when no interval is computable (single sample), never
/// expressed as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Point estimate.
    pub center: f64,
    /// `(lower, upper)` interval, when computable.
    pub bounds: Option<(f64, f64)>,
}

impl Estimate {
    /// A bare point estimate.
    pub fn point(center: f64) -> Self {
        Self {
            center,
            bounds: None,
        }
    }

    /// A point estimate with an interval.
    pub fn interval(center: f64, lower: f64, upper: f64) -> Self {
        Self {
            center,
            bounds: Some((lower, upper)),
        }
    }

    /// Lower bound, when present.
    pub fn lower(&self) -> Option<f64> {
        self.bounds.map(|(lo, _)| lo)
    }

    /// Upper bound, when present.
    pub fn upper(&self) -> Option<f64> {
        self.bounds.map(|(_, hi)| hi)
    }
}

/// Statistics derived from a [`Results`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Retained samples.
    pub n: usize,
    /// Total evaluations across all retained samples.
    pub n_evaluations: f64,
    /// Per-evaluation wall time, nanoseconds.
    pub elapsed_ns: Estimate,
    /// Percent of wall time spent in reclamation, `[0, 100]`.
    pub gc_percent: Estimate,
    /// Per-evaluation heap bytes, from the minimum-ratio sample.
    pub bytes_per_evaluation: u64,
    /// Per-evaluation allocator operations, from the minimum-ratio sample.
    pub allocations_per_evaluation: u64,
    /// Goodness of the linear fit; present iff the geometric search ran.
    pub r_squared: Option<f64>,
}

impl Summary {
    /// Compute a summary, case-split on the result flags.
    pub fn from_results(results: &Results) -> Result<Summary, Error> {
        let store = &results.samples;
        if store.is_empty() {
            return Err(Error::InsufficientData);
        }

        let n = store.len();
        let n_evaluations: f64 = store.evaluations().iter().sum();

        let fit = if results.search_performed {
            Some(stats::ols(store.evaluations(), store.elapsed_ns()))
        } else {
            None
        };

        let elapsed_ns = if let Some(fit) = &fit {
            // Per-evaluation time is the slope of total time against
            // evaluations; the intercept absorbs per-sample overhead.
            sigma_interval(fit.slope, fit.slope_stderr)
        } else if results.multiple_samples {
            // Every retained sample is a single evaluation.
            let m = stats::mean(store.elapsed_ns());
            sigma_interval(m, stats::std_err(store.elapsed_ns()))
        } else {
            Estimate::point(store.elapsed_ns()[0])
        };

        // The GC share of a sample is assumed independent of how many
        // evaluations the sample folds, so the ratio path applies whether
        // or not the search ran.
        let gc_percent = if results.multiple_samples {
            let ratios: Vec<f64> = store
                .gc_ns()
                .iter()
                .zip(store.elapsed_ns())
                .map(|(&gc, &t)| if t > 0.0 { gc / t } else { 0.0 })
                .collect();
            let center = 100.0 * stats::mean(&ratios);
            let half = CI_SIGMA * 100.0 * stats::std_err(&ratios);
            Estimate::interval(
                center,
                (center - half).max(0.0),
                (center + half).min(100.0),
            )
        } else {
            let t = store.elapsed_ns()[0];
            Estimate::point(if t > 0.0 { 100.0 * store.gc_ns()[0] / t } else { 0.0 })
        };

        // Allocator readings are biased upward by coincidental activity
        // during a sample, never downward below the true cost, so the
        // cheapest sample is the estimate.
        let mut min_ratio_index = 0;
        for i in 1..n {
            let candidate = store.bytes_allocated()[i] as f64 / store.evaluations()[i];
            let current =
                store.bytes_allocated()[min_ratio_index] as f64 / store.evaluations()[min_ratio_index];
            if candidate < current {
                min_ratio_index = i;
            }
        }
        let evals = store.evaluations()[min_ratio_index];
        let bytes_per_evaluation =
            (store.bytes_allocated()[min_ratio_index] as f64 / evals).floor() as u64;
        let allocations_per_evaluation =
            (store.allocations()[min_ratio_index] as f64 / evals).floor() as u64;

        let r_squared = fit.map(|f| f.r_squared);

        Ok(Summary {
            n,
            n_evaluations,
            elapsed_ns,
            gc_percent,
            bytes_per_evaluation,
            allocations_per_evaluation,
            r_squared,
        })
    }
}

fn sigma_interval(center: f64, sem: f64) -> Estimate {
    let half = CI_SIGMA * sem;
    Estimate::interval(center, (center - half).max(0.0), center + half)
}
