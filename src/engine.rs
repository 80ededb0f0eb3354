//! The adaptive sampling engine.
//!
//! [`Executor::run`] drives a [`Benchmarkable`] through up to five ordered
//! phases, any of which may finish the run:
//!
//! 1. **First call**: one sample with one evaluation. Possibly biased by
//!    one-shot compilation or cache warming; its time prices the rest of
//!    the run.
//! 2. **Affordability check**: if the remaining budget cannot pay for even
//!    one more sample at the biased price, return what we have.
//! 3. **Unbiased first sample**: discard the biased row and measure once
//!    more.
//! 4. **Direct sampling**: an expression spanning comfortably many clock
//!    ticks per evaluation is measured one evaluation per sample, as many
//!    samples as budget and the sample target allow.
//! 5. **Geometric search**: a sub-tick expression is folded. The evaluation
//!    count per sample grows geometrically until the linear fit of total
//!    time against evaluations is good enough, and the per-evaluation time
//!    is that fit's slope.
//!
//! The engine is single-threaded and sequential, consults no randomness,
//! and checks its budget only between benchmarkable invocations.

use std::time::Instant;

use crate::benchmarkable::{Benchmarkable, Plan};
use crate::config::Config;
use crate::error::Error;
use crate::measurement::clock;
use crate::results::Results;
use crate::samples::SampleStore;
use crate::stats;

/// Builder and entry point for benchmark execution.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tachymeter::{routine, Executor};
///
/// let mut r = routine(|| (0..100u64).sum::<u64>());
/// let results = Executor::new()
///     .samples(200)
///     .budget(Duration::from_secs(2))
///     .run(&mut r)?;
/// println!("{}", results.summary()?.elapsed_ns.center);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: Config,
}

impl Executor {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the target number of retained samples.
    ///
    /// # Panics
    ///
    /// Panics if `n` is 0.
    pub fn samples(mut self, n: usize) -> Self {
        assert!(n >= 1, "samples must be >= 1 (got {})", n);
        self.config.samples = n;
        self
    }

    /// Set the wall-clock budget.
    pub fn budget(mut self, budget: std::time::Duration) -> Self {
        self.config.budget = budget;
        self
    }

    /// Set the goodness-of-fit target ending the geometric search.
    ///
    /// # Panics
    ///
    /// Panics if `tau` is not in (0, 1).
    pub fn r2_target(mut self, tau: f64) -> Self {
        assert!(
            tau > 0.0 && tau < 1.0,
            "r2_target must be in (0, 1), got {}",
            tau
        );
        self.config.r2_target = tau;
        self
    }

    /// Set the geometric growth factor for folded evaluations.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not greater than 1.
    pub fn growth_factor(mut self, alpha: f64) -> Self {
        assert!(alpha > 1.0, "growth_factor must be > 1, got {}", alpha);
        self.config.growth_factor = alpha;
        self
    }

    /// Set the samples recorded per search iteration.
    ///
    /// # Panics
    ///
    /// Panics if `n` is below 2.
    pub fn ols_samples(mut self, n: usize) -> Self {
        assert!(n >= 2, "ols_samples must be >= 2 (got {})", n);
        self.config.ols_samples = n;
        self
    }

    /// Set the direct-sampling threshold in clock ticks.
    ///
    /// # Panics
    ///
    /// Panics if `ticks` is not positive.
    pub fn direct_sampling_ticks(mut self, ticks: f64) -> Self {
        assert!(ticks > 0.0, "direct_sampling_ticks must be > 0, got {}", ticks);
        self.config.direct_sampling_ticks = ticks;
        self
    }

    /// Set the number of paired reads used by the resolution probe.
    pub fn resolution_trials(mut self, n: usize) -> Self {
        self.config.resolution_trials = n;
        self
    }

    /// Report phase transitions and search progress on stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute a benchmarkable and return the raw outcome.
    ///
    /// # Errors
    ///
    /// `Error::NonMonotonicClock` if the resolution probe observes a
    /// decreasing clock; any error the benchmarkable itself reports. In
    /// both cases no partial results are returned.
    pub fn run<B>(&self, benchmarkable: &mut B) -> Result<Results, Error>
    where
        B: Benchmarkable + ?Sized,
    {
        let start = Instant::now();
        let resolution_ns = clock::resolution(self.config.resolution_trials)?;
        self.report(format_args!(
            "clock resolution {} ({} trials)",
            if resolution_ns.is_finite() {
                format!("{:.0}ns", resolution_ns)
            } else {
                "unresolvable".to_string()
            },
            self.config.resolution_trials
        ));

        let mut store = SampleStore::with_capacity(self.config.samples.max(2));

        // Phase 1: first call, possibly biased by one-shot warmup cost.
        benchmarkable.run(&mut store, Plan::new(1, 1))?;
        let biased_ns = store.elapsed_ns()[0];
        tracing::debug!(biased_ns, "first (possibly biased) sample");
        if self.out_of_budget(start) {
            self.report(format_args!("budget spent by first call"));
            return Ok(self.finish(store, start, false, false, false));
        }

        // Phase 2: can the remaining budget pay for another sample at the
        // biased price?
        if self.affordable_samples(start, biased_ns) < 1 {
            self.report(format_args!(
                "budget cannot fit a second sample at {:.0}ns",
                biased_ns
            ));
            return Ok(self.finish(store, start, false, false, false));
        }

        // Phase 3: drop the biased row and measure once more, cold costs
        // now paid.
        store.clear();
        benchmarkable.run(&mut store, Plan::new(1, 1))?;
        let debiased_ns = store.elapsed_ns()[0];
        tracing::debug!(debiased_ns, "debiased sample");
        if self.out_of_budget(start) || self.config.samples == 1 {
            return Ok(self.finish(store, start, true, false, false));
        }

        // Phase 4: direct sampling when one evaluation spans comfortably
        // many clock ticks.
        if debiased_ns > self.config.direct_sampling_ticks * resolution_ns {
            let affordable = self.affordable_samples(start, debiased_ns);
            let remaining = affordable.min(self.config.samples - 1);
            self.report(format_args!(
                "direct sampling: {} more samples at ~{:.0}ns each",
                remaining, debiased_ns
            ));
            if remaining == 0 {
                // The budget shrank between the affordability check and
                // here; the single debiased sample stands alone.
                return Ok(self.finish(store, start, true, false, false));
            }
            benchmarkable.run(&mut store, Plan::new(1, remaining))?;
            return Ok(self.finish(store, start, true, true, false));
        }

        // Phase 5: geometric search. Fold evaluations until the linear fit
        // of total time against evaluations is good enough. Always runs at
        // least one iteration.
        let mut n_evals = 2.0f64;
        loop {
            let folded = n_evals.ceil() as u64;
            benchmarkable.run(&mut store, Plan::new(folded, self.config.ols_samples))?;
            let fit = stats::ols(store.evaluations(), store.elapsed_ns());
            tracing::debug!(
                folded,
                r_squared = fit.r_squared,
                slope = fit.slope,
                "search iteration"
            );
            self.report(format_args!(
                "search: {} evaluations/sample, r²={:.4}",
                folded, fit.r_squared
            ));
            if fit.r_squared > self.config.r2_target || self.out_of_budget(start) {
                break;
            }
            n_evals = grow(n_evals, self.config.growth_factor);
        }

        Ok(self.finish(store, start, true, true, true))
    }

    fn out_of_budget(&self, start: Instant) -> bool {
        start.elapsed() > self.config.budget
    }

    /// Whole samples the remaining budget can pay for at `per_sample_ns`.
    fn affordable_samples(&self, start: Instant, per_sample_ns: f64) -> usize {
        let remaining_ns = self
            .config
            .budget
            .saturating_sub(start.elapsed())
            .as_nanos() as f64;
        let affordable = (remaining_ns / per_sample_ns).floor();
        if affordable.is_finite() {
            affordable.min(usize::MAX as f64) as usize
        } else {
            // A zero-cost sample affords arbitrarily many.
            usize::MAX
        }
    }

    fn finish(
        &self,
        samples: SampleStore,
        start: Instant,
        precompiled: bool,
        multiple_samples: bool,
        search_performed: bool,
    ) -> Results {
        debug_assert_eq!(multiple_samples, samples.len() > 1);
        let results = Results {
            precompiled,
            multiple_samples,
            search_performed,
            samples,
            time_used: start.elapsed().as_secs_f64(),
        };
        tracing::debug!(
            n = results.samples.len(),
            precompiled,
            multiple_samples,
            search_performed,
            time_used = results.time_used,
            "run finished"
        );
        results
    }

    fn report(&self, message: std::fmt::Arguments<'_>) {
        if self.config.verbose {
            eprintln!("tachymeter: {}", message);
        }
    }
}

/// Next folded evaluation count.
///
/// Multiplying a small count by a factor near 1 can leave the ceiling
/// unchanged (`ceil(2.2 * 1.1) == ceil(2.2)`). The search requires every
/// iteration's ceiling to strictly advance, so the count is bumped past the
/// previous ceiling when multiplication alone stalls.
fn grow(n_evals: f64, factor: f64) -> f64 {
    let grown = n_evals * factor;
    if grown.ceil() > n_evals.ceil() {
        grown
    } else {
        n_evals.ceil() + 1.0
    }
}
