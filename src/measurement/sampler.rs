//! Adaptive batch sampler.
//!
//! Runs the measured function in batches and accumulates batch timings as
//! deltas from a running estimate of the batch duration. After a warm-up
//! period the batch size is re-derived so that every batch lasts well above
//! the clock's noise floor, and everything gathered so far is thrown away.
//!
//! The sampler never stops in the middle of a batch: the deadline is only
//! checked between batches, so a measured function slower than the whole
//! time budget still completes one batch.

use serde::{Deserialize, Serialize};

use super::clock::Clock;

/// Value returned by a measured function.
///
/// `()` always keeps the batch. `bool` is a keep signal: returning `false`
/// from any call in a batch discards that batch's timing, e.g. when the call
/// had to lazily rebuild state that should not be measured.
pub trait BatchOutcome {
    /// Whether the batch containing this call should be kept.
    fn keep(self) -> bool;
}

impl BatchOutcome for () {
    #[inline(always)]
    fn keep(self) -> bool {
        true
    }
}

impl BatchOutcome for bool {
    #[inline(always)]
    fn keep(self) -> bool {
        self
    }
}

/// Parameters for one sampling run. All times are in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerParams {
    /// Total time budget.
    pub max_time_ns: i64,
    /// Length of the warm-up phase. Non-positive or not below `max_time_ns`
    /// means no separate warm-up.
    pub warm_up_ns: i64,
    /// Shortest batch duration the clock can resolve. Non-positive is treated as 1.
    pub noise_floor_ns: i64,
    /// Lower bound on calls per batch.
    pub min_batch_size: u64,
    /// Minimum number of deadline checks the resized batches should leave
    /// before the budget runs out.
    pub min_end_checks: u64,
}

impl SamplerParams {
    /// Parameters with the default batch size floor (1) and end checks (5).
    pub fn new(max_time_ns: i64, warm_up_ns: i64, noise_floor_ns: i64) -> Self {
        Self {
            max_time_ns,
            warm_up_ns,
            noise_floor_ns,
            min_batch_size: 1,
            min_end_checks: 5,
        }
    }

    /// Override the minimum batch size.
    pub fn min_batch_size(mut self, size: u64) -> Self {
        self.min_batch_size = size;
        self
    }

    /// Override the minimum number of end checks.
    pub fn min_end_checks(mut self, checks: u64) -> Self {
        self.min_end_checks = checks;
        self
    }

    fn first_deadline_ns(&self) -> i64 {
        if self.warm_up_ns <= 0 || self.warm_up_ns > self.max_time_ns {
            self.max_time_ns
        } else {
            self.warm_up_ns
        }
    }
}

/// Accumulated batch statistics from one sampling run.
///
/// Timings are stored as deltas from `mean_time_estimate`, which keeps the
/// sums small and the variance computation stable. Add the estimate back to
/// recover absolute batch durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStats {
    /// Kept batches since the last reset.
    pub batch_count: u64,
    /// Measured-function calls per batch.
    pub batch_size: u64,
    /// Sum of `batch_duration - mean_time_estimate` over kept batches.
    pub time_sum: i128,
    /// Sum of the squared deltas.
    pub squared_time_sum: i128,
    /// Smallest delta, `i64::MAX` while empty.
    pub min_delta: i64,
    /// Largest delta, `i64::MIN` while empty.
    pub max_delta: i64,
    /// Estimated duration of one batch in nanoseconds.
    pub mean_time_estimate: i64,
    /// Rejected batches since the last reset.
    pub rejected_batches: u64,
    /// Warm-up checkpoints taken.
    pub resizes: u32,
    /// Time from the first batch to termination.
    pub total_elapsed_ns: i64,
}

impl RawStats {
    /// Empty statistics for batches of `batch_size` calls.
    pub fn new(batch_size: u64) -> Self {
        Self {
            batch_count: 0,
            batch_size: batch_size.max(1),
            time_sum: 0,
            squared_time_sum: 0,
            min_delta: i64::MAX,
            max_delta: i64::MIN,
            mean_time_estimate: 0,
            rejected_batches: 0,
            resizes: 0,
            total_elapsed_ns: 0,
        }
    }

    /// Whether no batch has been kept since the last reset.
    pub fn is_empty(&self) -> bool {
        self.batch_count == 0
    }

    /// Record a kept batch that took `batch_ns` nanoseconds.
    pub fn record(&mut self, batch_ns: i64) {
        let delta = batch_ns.saturating_sub(self.mean_time_estimate);
        let wide = i128::from(delta);

        self.time_sum += wide;
        self.squared_time_sum += wide * wide;
        self.batch_count += 1;
        self.min_delta = self.min_delta.min(delta);
        self.max_delta = self.max_delta.max(delta);
    }

    /// Discard all accumulated timings, keeping batch size and estimate.
    pub fn clear(&mut self) {
        self.batch_count = 0;
        self.time_sum = 0;
        self.squared_time_sum = 0;
        self.min_delta = i64::MAX;
        self.max_delta = i64::MIN;
        self.rejected_batches = 0;
    }

    /// Sum of absolute batch durations (deltas plus the estimate).
    pub fn absolute_time_sum(&self) -> i128 {
        self.time_sum + i128::from(self.mean_time_estimate) * i128::from(self.batch_count)
    }

    /// Re-derive batch size and estimate at a checkpoint, then clear.
    ///
    /// The new batch size spreads the remaining budget over at least
    /// `min_end_checks` batches, each roughly one noise floor long or longer.
    fn resize(&mut self, total_elapsed_ns: i64, params: &SamplerParams, noise_floor_ns: i64) {
        let iters = (i128::from(self.batch_count) * i128::from(self.batch_size)).max(1);
        let remaining = i128::from(params.max_time_ns.saturating_sub(total_elapsed_ns).max(0));

        let num_checks =
            (remaining / i128::from(noise_floor_ns)).max(i128::from(params.min_end_checks));
        let den = (i128::from(total_elapsed_ns) * num_checks).max(1);

        let new_size = (iters * remaining / den)
            .max(i128::from(params.min_batch_size))
            .min(i128::from(u64::MAX)) as u64;

        // per-call mean scaled to the new batch size, as one fraction to
        // avoid truncating sub-nanosecond calls to zero
        let estimate = if self.batch_count == 0 {
            0
        } else {
            (self.absolute_time_sum() * i128::from(new_size) / iters)
                .clamp(0, i128::from(i64::MAX)) as i64
        };

        tracing::debug!(
            elapsed_ns = total_elapsed_ns,
            kept_batches = self.batch_count,
            old_batch_size = self.batch_size,
            new_batch_size = new_size,
            batch_estimate_ns = estimate,
            "resizing batches after warm-up"
        );

        self.batch_size = new_size;
        self.mean_time_estimate = estimate;
        self.resizes += 1;
        self.clear();
    }
}

/// Run `measured` in adaptively sized batches until the time budget is spent.
///
/// # Panics
///
/// Panics if `max_time_ns` is negative or `min_batch_size` or
/// `min_end_checks` is zero.
pub fn gather<C, F, O>(clock: &C, params: &SamplerParams, mut measured: F) -> RawStats
where
    C: Clock + ?Sized,
    F: FnMut() -> O,
    O: BatchOutcome,
{
    assert!(params.max_time_ns >= 0, "time budget must not be negative");
    assert!(params.min_batch_size > 0, "batches need at least one call");
    assert!(params.min_end_checks > 0, "at least one end check is required");

    let noise_floor_ns = params.noise_floor_ns.max(1);
    let mut deadline = params.first_deadline_ns();
    let mut stats = RawStats::new(params.min_batch_size);

    let start = clock.now_ns();
    let mut from = start;
    loop {
        let mut rejected = false;
        for _ in 0..stats.batch_size {
            rejected |= !measured().keep();
        }

        let now = clock.now_ns();
        let batch_ns = now.saturating_sub(from) as i64;
        let total_ns = now.saturating_sub(start) as i64;
        from = now;

        if rejected {
            stats.rejected_batches += 1;
        } else {
            stats.record(batch_ns);
        }

        if total_ns > deadline {
            if total_ns > params.max_time_ns {
                stats.total_elapsed_ns = total_ns;
                break;
            }

            stats.resize(total_ns, params, noise_floor_ns);
            deadline = params.max_time_ns;
        }
    }

    if stats.is_empty() {
        tracing::warn!(
            rejected = stats.rejected_batches,
            "every batch after warm-up was rejected; no timings retained"
        );
    }

    stats
}
