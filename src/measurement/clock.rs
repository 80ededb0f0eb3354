//! Monotonic nanosecond clock and resolution probe.
//!
//! The engine's notion of "the finest meaningful measurement" comes from
//! [`resolution`]: the smallest positive difference observed between two
//! back-to-back clock reads. Expressions whose debiased single-evaluation
//! time does not comfortably exceed this value cannot be measured directly
//! and are folded through the geometric search instead.

use std::sync::OnceLock;
use std::time::Instant;

use crate::error::Error;

/// Default number of paired reads used by [`resolution`].
pub const DEFAULT_RESOLUTION_TRIALS: usize = 10_000;

fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// Current monotonic time in integer nanoseconds.
///
/// Readings are offsets from a process-wide epoch fixed on first use, so
/// differences between any two readings are meaningful across the whole
/// process lifetime.
#[inline]
pub fn monotonic_ns() -> u64 {
    epoch().elapsed().as_nanos() as u64
}

/// Estimate the smallest observable positive clock interval, in nanoseconds.
///
/// Reads the clock twice in immediate succession `trials` times and returns
/// the minimum positive difference. On hosts whose clock never advances
/// between adjacent reads the estimate is `f64::INFINITY`; the engine's
/// direct-sampling guard (`elapsed > ticks x resolution`) then never passes,
/// so such hosts always take the folded evaluation path.
///
/// # Errors
///
/// `Error::NonMonotonicClock` if any trial observes a decreasing reading.
/// This cannot happen with the `Instant`-backed reader but guards the raw
/// comparison so a replacement clock source is checked the same way.
pub fn resolution(trials: usize) -> Result<f64, Error> {
    let mut min_positive = f64::INFINITY;
    let mut negative_steps = 0usize;

    for _ in 0..trials {
        let first = monotonic_ns();
        let second = monotonic_ns();
        if second < first {
            negative_steps += 1;
            continue;
        }
        let delta = (second - first) as f64;
        if delta > 0.0 && delta < min_positive {
            min_positive = delta;
        }
    }

    if negative_steps > 0 {
        return Err(Error::NonMonotonicClock { negative_steps });
    }

    if min_positive.is_infinite() {
        tracing::warn!(
            trials,
            "clock never advanced between adjacent reads; direct sampling disabled"
        );
    }

    Ok(min_positive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_ns_advances() {
        let a = monotonic_ns();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let b = monotonic_ns();
        assert!(b > a);
    }

    #[test]
    fn test_resolution_at_least_one_ns() {
        // Integer-nanosecond clocks can't observe a positive difference
        // below 1ns. Coarse hosts may legitimately report infinity.
        let res = resolution(DEFAULT_RESOLUTION_TRIALS).unwrap();
        assert!(res >= 1.0);
    }

    #[test]
    fn test_resolution_zero_trials_is_infinite() {
        let res = resolution(0).unwrap();
        assert!(res.is_infinite());
    }
}
