//! Configuration for the adaptive sampling engine.

use std::time::Duration;

/// Configuration options for [`Executor`](crate::Executor).
#[derive(Debug, Clone)]
pub struct Config {
    /// Target number of retained samples (default: 100).
    ///
    /// The engine records fewer when the budget runs out first, and exactly
    /// one when set to 1.
    pub samples: usize,

    /// Wall-clock budget for the whole run (default: 10s).
    ///
    /// Checked between benchmarkable invocations, never mid-sample, so a
    /// run may overshoot by at most one invocation.
    pub budget: Duration,

    /// Goodness-of-fit target that ends the geometric search
    /// (default: 0.95).
    ///
    /// A heuristic carried from long benchmarking practice rather than a
    /// formal bound; raise it for tighter fits at the cost of budget.
    pub r2_target: f64,

    /// Multiplier applied to the folded evaluation count between search
    /// iterations (default: 1.1).
    pub growth_factor: f64,

    /// Samples recorded per geometric-search iteration (default: 100).
    pub ols_samples: usize,

    /// Direct-sampling threshold, in clock ticks (default: 1000).
    ///
    /// A debiased single evaluation spanning more than this many ticks of
    /// the probed clock resolution is considered directly measurable; the
    /// engine then skips the geometric search. A policy choice, not a
    /// statistical bound.
    pub direct_sampling_ticks: f64,

    /// Paired clock reads used by the resolution probe (default: 10,000).
    pub resolution_trials: usize,

    /// Report phase transitions and search progress on stderr
    /// (default: false).
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            samples: 100,
            budget: Duration::from_secs(10),
            r2_target: 0.95,
            growth_factor: 1.1,
            ols_samples: 100,
            direct_sampling_ticks: 1000.0,
            resolution_trials: crate::measurement::DEFAULT_RESOLUTION_TRIALS,
            verbose: false,
        }
    }
}
