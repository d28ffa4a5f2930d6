//! Benchmark result types.

use serde::{Deserialize, Serialize};

use crate::measurement::ClockStats;
use crate::statistics::TimeUnit;

/// Per-call timing statistics of a measured function.
///
/// `mean`, `deviation`, `min` and `max` are expressed in `unit` and are
/// already corrected for batching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchResult {
    /// Mean duration of one logical unit.
    pub mean: f64,

    /// Standard deviation of one logical unit's duration.
    pub deviation: f64,

    /// Lower extreme, widened from the batch minimum. Never negative.
    pub min: f64,

    /// Upper extreme, widened from the batch maximum.
    pub max: f64,

    /// Logical units coalesced into one timing sample, including the
    /// caller's calls-per-unit multiplier. Usually 1, larger for very fast
    /// functions.
    pub batch_size: u64,

    /// Logical units that contributed to the statistics.
    pub iters: u64,

    /// Unit of the four timing figures.
    pub unit: TimeUnit,
}

impl BenchResult {
    /// Express the timing figures in another unit.
    pub fn to_unit(&self, unit: TimeUnit) -> Self {
        let convert = |v: f64| self.unit.convert(v, unit);
        Self {
            mean: convert(self.mean),
            deviation: convert(self.deviation),
            min: convert(self.min),
            max: convert(self.max),
            unit,
            ..*self
        }
    }

    /// Whether any measurement contributed to this result.
    pub fn is_empty(&self) -> bool {
        self.iters == 0
    }

    /// Mean duration in nanoseconds.
    pub fn mean_ns(&self) -> f64 {
        self.unit.convert(self.mean, TimeUnit::Nanoseconds)
    }

    /// Panic unless `0 <= min <= mean <= max` and every figure is finite and non-negative.
    pub(crate) fn assert_plausible(&self) {
        for (name, value) in [
            ("mean", self.mean),
            ("deviation", self.deviation),
            ("min", self.min),
            ("max", self.max),
        ] {
            assert!(
                value.is_finite() && value >= 0.0,
                "{} must be finite and non-negative, got {}",
                name,
                value
            );
        }
        assert!(
            self.min <= self.mean && self.mean <= self.max,
            "expected min <= mean <= max, got {} / {} / {}",
            self.min,
            self.mean,
            self.max
        );
    }
}

/// Context about how a result was obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Back-to-back clock read statistics used to size batches.
    pub clock: ClockStats,

    /// Minimum batch duration targeted by the sampler, in nanoseconds.
    pub noise_floor_ns: i64,

    /// Batches that contributed to the statistics.
    pub batch_count: u64,

    /// Batches discarded because the measured function asked for it.
    pub rejected_batches: u64,

    /// Wall-clock time of the whole run, calibration included.
    pub runtime_secs: f64,
}

/// Result of a benchmark run together with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// Reduced per-call statistics.
    pub result: BenchResult,

    /// Calibration and sampling details.
    pub metadata: Metadata,
}
