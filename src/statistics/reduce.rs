//! Reduction of raw batch statistics to per-call figures.
//!
//! Each kept batch is one sample: the total duration of `batch_size` calls.
//! Treating that total as a sum of independent draws, the central limit
//! theorem gives
//!
//! ```text
//! stddev(batch total) = stddev(call) * sqrt(batch_size)
//! ```
//!
//! so the per-call deviation is the batch deviation divided by
//! `sqrt(batch_size)`. Min and max are corrected with the same factor
//! applied to their distance from the mean, so they keep their position
//! relative to the spread rather than collapsing onto the mean.

use crate::measurement::RawStats;
use crate::result::BenchResult;

use super::units::TimeUnit;

/// Convert sampler output to mean, deviation, min and max per logical unit.
///
/// `calls_per_unit` scales the batch size when one call of the measured
/// function performs several units of work.
///
/// With no kept batches the result is all zeros with `iters == 0`.
///
/// # Panics
///
/// Panics if `calls_per_unit` is zero, if `stats` violates
/// `min_delta * n <= time_sum <= max_delta * n`, or if the reduced figures
/// are not ordered `0 <= min <= mean <= max`. Either of the last two means
/// the accounting upstream is wrong.
pub fn reduce(stats: &RawStats, calls_per_unit: u64, unit: TimeUnit) -> BenchResult {
    assert!(calls_per_unit > 0, "calls_per_unit must be at least 1");

    let batch_size = stats.batch_size.saturating_mul(calls_per_unit);
    let iters = batch_size.saturating_mul(stats.batch_count);

    if stats.batch_count == 0 {
        return BenchResult {
            mean: 0.0,
            deviation: 0.0,
            min: 0.0,
            max: 0.0,
            batch_size,
            iters: 0,
            unit,
        };
    }

    let n = i128::from(stats.batch_count);
    assert!(
        i128::from(stats.min_delta) * n <= stats.time_sum,
        "min delta {} above mean of {} batches (sum {})",
        stats.min_delta,
        n,
        stats.time_sum
    );
    assert!(
        i128::from(stats.max_delta) * n >= stats.time_sum,
        "max delta {} below mean of {} batches (sum {})",
        stats.max_delta,
        n,
        stats.time_sum
    );

    let batch_deviation_ns = batch_deviation(stats);

    let estimate = i128::from(stats.mean_time_estimate);
    let mean_batch_ns = stats.absolute_time_sum() as f64 / n as f64;
    let min_batch_ns = (i128::from(stats.min_delta) + estimate) as f64;
    let max_batch_ns = (i128::from(stats.max_delta) + estimate) as f64;

    let per_call = batch_size as f64 * unit.nanos() as f64;
    let mean = mean_batch_ns / per_call;
    let raw_min = min_batch_ns / per_call;
    let raw_max = max_batch_ns / per_call;

    let sqrt_batch = (batch_size as f64).sqrt();
    let deviation = batch_deviation_ns / (unit.nanos() as f64 * sqrt_batch);

    // widening towards zero-cost operations can cross zero
    let min = (mean + (raw_min - mean) * sqrt_batch).max(0.0);
    let max = mean + (raw_max - mean) * sqrt_batch;

    let result = BenchResult {
        mean,
        deviation,
        min,
        max,
        batch_size,
        iters,
        unit,
    };
    result.assert_plausible();
    result
}

/// Sample standard deviation of batch durations in nanoseconds.
///
/// Computed from the delta sums as `(Σd² - (Σd)²/n) / (n - 1)`. The running
/// estimate is subtracted from every delta, so the sums stay small and the
/// subtraction does not lose precision.
fn batch_deviation(stats: &RawStats) -> f64 {
    if stats.batch_count <= 1 {
        return 0.0;
    }

    let n = stats.batch_count as f64;
    let sum = stats.time_sum as f64;
    let sum2 = stats.squared_time_sum as f64;

    let variance = (sum2 - sum * sum / n) / (n - 1.0);
    // rounding can leave a tiny negative variance
    variance.abs().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn stats_from(batch_size: u64, estimate: i64, durations: &[i64]) -> RawStats {
        let mut stats = RawStats::new(batch_size);
        stats.mean_time_estimate = estimate;
        for &d in durations {
            stats.record(d);
        }
        stats
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_constant_batches_have_zero_deviation() {
        let stats = stats_from(1, 1_000_000, &[1_000_000; 95]);
        let result = reduce(&stats, 1, TimeUnit::Milliseconds);

        assert_eq!(result.mean, 1.0);
        assert_eq!(result.deviation, 0.0);
        assert_eq!(result.min, 1.0);
        assert_eq!(result.max, 1.0);
        assert_eq!(result.iters, 95);
    }

    #[test]
    fn test_sample_variance() {
        // 2, 4, 4, 4, 5, 5, 7, 9 -> sample variance 32/7
        let stats = stats_from(1, 0, &[2, 4, 4, 4, 5, 5, 7, 9]);
        let result = reduce(&stats, 1, TimeUnit::Nanoseconds);

        assert!(approx_eq(result.mean, 5.0));
        assert!(approx_eq(result.deviation, (32.0f64 / 7.0).sqrt()));
        assert!(approx_eq(result.min, 2.0));
        assert!(approx_eq(result.max, 9.0));
    }

    #[test]
    fn test_estimate_offset_does_not_change_result() {
        let durations = [120, 95, 101, 130, 88, 110];
        let a = reduce(&stats_from(1, 0, &durations), 1, TimeUnit::Nanoseconds);
        let b = reduce(&stats_from(1, 100, &durations), 1, TimeUnit::Nanoseconds);

        assert!(approx_eq(a.mean, b.mean));
        assert!(approx_eq(a.deviation, b.deviation));
        assert!(approx_eq(a.min, b.min));
        assert!(approx_eq(a.max, b.max));
    }

    #[test]
    fn test_clt_correction() {
        // batches of 100 calls, totals 900ns and 1100ns
        let stats = stats_from(100, 1_000, &[900, 1_100]);
        let result = reduce(&stats, 1, TimeUnit::Nanoseconds);

        assert!(approx_eq(result.mean, 10.0));
        // batch sd = sqrt(2 * 100^2 / 1) = 141.42..., per call / sqrt(100)
        assert!(approx_eq(result.deviation, 20_000f64.sqrt() / 10.0));
        // per-call min 9.0 is 1.0 below the mean, widened by sqrt(100)
        assert!(approx_eq(result.min, 0.0));
        assert!(approx_eq(result.max, 20.0));
    }

    #[test]
    fn test_min_clamped_at_zero() {
        let stats = stats_from(10_000, 0, &[1, 50, 100]);
        let result = reduce(&stats, 1, TimeUnit::Nanoseconds);
        assert_eq!(result.min, 0.0);
        assert!(result.max >= result.mean);
    }

    #[test]
    fn test_calls_per_unit_scales_batch_size() {
        let stats = stats_from(1, 100_000_000, &[100_000_000; 10]);
        let result = reduce(&stats, 100, TimeUnit::Milliseconds);

        assert_eq!(result.batch_size, 100);
        assert_eq!(result.iters, 1_000);
        assert!(approx_eq(result.mean, 1.0));
    }

    #[test]
    fn test_empty_stats() {
        let stats = RawStats::new(8);
        let result = reduce(&stats, 2, TimeUnit::Microseconds);

        assert_eq!(result.iters, 0);
        assert_eq!(result.batch_size, 16);
        assert_eq!(result.mean, 0.0);
        assert_eq!(result.deviation, 0.0);
        assert_eq!(result.min, 0.0);
        assert_eq!(result.max, 0.0);
    }

    #[test]
    fn test_single_batch_has_zero_deviation() {
        let stats = stats_from(4, 0, &[400]);
        let result = reduce(&stats, 1, TimeUnit::Nanoseconds);
        assert_eq!(result.deviation, 0.0);
        assert!(approx_eq(result.mean, 100.0));
    }

    #[test]
    fn test_reduce_is_pure() {
        let stats = stats_from(3, 250, &[700, 760, 810, 745]);
        let a = reduce(&stats, 2, TimeUnit::Microseconds);
        let b = reduce(&stats, 2, TimeUnit::Microseconds);
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_stats_keep_ordering() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let batch_size = rng.random_range(1..=1_000u64);
            let calls_per_unit = rng.random_range(1..=10u64);
            let count = rng.random_range(0..200usize);
            let base = rng.random_range(0..10_000_000i64);
            let estimate = rng.random_range(0..=base.max(1));

            let durations: Vec<i64> = (0..count)
                .map(|_| base + rng.random_range(0..1_000_000i64))
                .collect();
            let stats = stats_from(batch_size, estimate, &durations);
            let result = reduce(&stats, calls_per_unit, TimeUnit::Nanoseconds);

            assert!(result.min >= 0.0);
            assert!(result.min <= result.mean, "{:?}", result);
            assert!(result.mean <= result.max, "{:?}", result);
            assert!(result.deviation >= 0.0);
            assert_eq!(result.iters, batch_size * calls_per_unit * count as u64);
        }
    }

    #[test]
    #[should_panic(expected = "calls_per_unit")]
    fn test_zero_calls_per_unit_panics() {
        reduce(&RawStats::new(1), 0, TimeUnit::Nanoseconds);
    }

    #[test]
    #[should_panic(expected = "min delta")]
    fn test_corrupt_stats_panic() {
        let mut stats = stats_from(1, 0, &[10, 20]);
        stats.min_delta = 100;
        reduce(&stats, 1, TimeUnit::Nanoseconds);
    }
}
