//! Error types for the benchmarking harness.

use std::fmt;

/// Error returned when a benchmark cannot produce a usable result.
///
/// Budget exhaustion is deliberately *not* represented here: running out of
/// time is a normal outcome, surfaced through the flags on
/// [`Results`](crate::Results). An `Error` means the harness has nothing
/// trustworthy to report at all.
#[derive(Debug)]
pub enum Error {
    /// The monotonic clock produced a decreasing reading during the
    /// resolution probe.
    ///
    /// All timing on this host is unreliable; no measurement is attempted.
    NonMonotonicClock {
        /// Number of probe trials that observed a backwards step.
        negative_steps: usize,
    },

    /// The benchmarkable's setup or core expression failed.
    ///
    /// Any samples recorded before the failure are discarded; no partial
    /// `Results` is returned.
    Benchmark(Box<dyn std::error::Error + Send + Sync>),

    /// A summary was requested from a `Results` with zero retained samples.
    ///
    /// Cannot arise from [`Executor::run`](crate::Executor::run) itself,
    /// which always retains at least one sample.
    InsufficientData,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NonMonotonicClock { negative_steps } => write!(
                f,
                "monotonic clock went backwards during {} resolution probe trial(s)",
                negative_steps
            ),
            Error::Benchmark(e) => write!(f, "benchmarkable failed: {}", e),
            Error::InsufficientData => {
                write!(f, "cannot summarize a result with zero retained samples")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Benchmark(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// Wrap an arbitrary failure from a benchmarkable's setup or core.
    pub fn benchmark<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Benchmark(Box::new(e))
    }
}
