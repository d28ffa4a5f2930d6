//! Clock noise-floor calibration.
//!
//! We don't care about the resolution the platform advertises. What matters
//! is the smallest interval the harness can actually observe, which is the
//! gap between two back-to-back reads of the same clock.

use serde::{Deserialize, Serialize};

use super::clock::Clock;

/// Reads taken by the discarded warm-up pass.
pub const WARM_UP_SAMPLES: u64 = 100;

/// Reads taken by the pass whose result is kept.
pub const CALIBRATION_SAMPLES: u64 = 1000;

/// Statistics over back-to-back clock reads, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockStats {
    /// Smallest observed gap (often 0 on coarse timers).
    pub min: i64,
    /// Largest observed gap.
    pub max: i64,
    /// Mean gap, never below 1.
    pub average: i64,
}

/// Measure the gap between consecutive clock reads.
///
/// Takes `sample_count` pairs of reads and reports their min, max and mean.
/// When the mean rounds down to zero (the clock ticks more coarsely than a
/// read costs) it is forced to 1 so the noise floor is never zero.
///
/// # Panics
///
/// Panics if `sample_count` is zero.
pub fn calibrate<C: Clock + ?Sized>(clock: &C, sample_count: u64) -> ClockStats {
    assert!(sample_count > 0, "calibration needs at least one sample");

    let mut sum: i128 = 0;
    let mut min = i64::MAX;
    let mut max = i64::MIN;

    for _ in 0..sample_count {
        let from = clock.now_ns();
        let to = clock.now_ns();
        let diff = to.saturating_sub(from) as i64;

        sum += i128::from(diff);
        min = min.min(diff);
        max = max.max(diff);
    }

    let mut average = (sum / i128::from(sample_count)) as i64;
    if average == 0 {
        tracing::warn!("clock gap averaged below 1ns, clamping noise estimate to 1ns");
        average = 1;
    }

    ClockStats { min, max, average }
}

/// Calibrate with a throwaway warm-up pass followed by the real pass.
///
/// The first reads of a timer are often much slower than steady state
/// (page faults, cold predictors, lazy symbol binding), so their result is
/// discarded.
pub fn calibrate_with_warm_up<C: Clock + ?Sized>(
    clock: &C,
    warm_up_samples: u64,
    sample_count: u64,
) -> ClockStats {
    if warm_up_samples > 0 {
        let _ = calibrate(clock, warm_up_samples);
    }
    let stats = calibrate(clock, sample_count);
    tracing::debug!(
        min_ns = stats.min,
        max_ns = stats.max,
        average_ns = stats.average,
        samples = sample_count,
        "clock calibrated"
    );
    stats
}
