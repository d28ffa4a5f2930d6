//! Main `Bencher` entry point and builder.

use std::time::Duration;

use crate::config::Config;
use crate::error::ConfigError;
use crate::measurement::{calibrate_with_warm_up, gather, BatchOutcome, Clock, MonotonicClock};
use crate::result::{BenchReport, Metadata};
use crate::statistics::{reduce, TimeUnit, SECOND_NANOSECONDS};

/// Configurable benchmark runner.
///
/// Every run calibrates the clock, samples the measured function in
/// adaptively sized batches and reduces the batch timings to per-call
/// statistics.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use microbench::{do_not_optimize, Bencher};
///
/// let data: Vec<u64> = (0..64).collect();
/// let report = Bencher::new()
///     .max_time(Duration::from_millis(20))
///     .run(|| {
///         do_not_optimize(data.iter().sum::<u64>());
///     })
///     .unwrap();
///
/// assert!(report.result.iters > 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bencher {
    config: Config,
}

impl Bencher {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Short runs for smoke tests: 50 ms budget.
    pub fn quick() -> Self {
        Self::new().max_time(Duration::from_millis(50))
    }

    /// Create from an existing configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// The configuration this runner uses.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set the total sampling budget.
    pub fn max_time(mut self, max_time: Duration) -> Self {
        self.config.max_time = max_time;
        self
    }

    /// Set the warm-up duration explicitly.
    pub fn warm_up(mut self, warm_up: Duration) -> Self {
        self.config.warm_up = Some(warm_up);
        self
    }

    /// Set how many logical units one call performs.
    pub fn calls_per_unit(mut self, calls: u64) -> Self {
        self.config.calls_per_unit = calls;
        self
    }

    /// Set the batch duration target as a multiple of the clock read gap.
    pub fn noise_floor_multiple(mut self, multiple: u64) -> Self {
        self.config.noise_floor_multiple = multiple;
        self
    }

    /// Set the minimum number of calls per batch.
    pub fn min_batch_size(mut self, size: u64) -> Self {
        self.config.min_batch_size = size;
        self
    }

    /// Set the minimum number of deadline checks after resizing.
    pub fn min_end_checks(mut self, checks: u64) -> Self {
        self.config.min_end_checks = checks;
        self
    }

    /// Set the unit of the reported figures.
    pub fn unit(mut self, unit: TimeUnit) -> Self {
        self.config.unit = unit;
        self
    }

    /// Benchmark `measured` against the system monotonic clock.
    pub fn run<F, O>(&self, measured: F) -> Result<BenchReport, ConfigError>
    where
        F: FnMut() -> O,
        O: BatchOutcome,
    {
        self.run_with_clock(&MonotonicClock::new(), measured)
    }

    /// Benchmark `measured` against a caller-supplied clock.
    ///
    /// The configuration is validated before the clock is first read.
    pub fn run_with_clock<C, F, O>(&self, clock: &C, measured: F) -> Result<BenchReport, ConfigError>
    where
        C: Clock + ?Sized,
        F: FnMut() -> O,
        O: BatchOutcome,
    {
        self.config.validate()?;

        let started = clock.now_ns();
        let clock_stats = calibrate_with_warm_up(
            clock,
            self.config.calibration_warm_up_samples,
            self.config.calibration_samples,
        );
        let params = self.config.sampler_params(clock_stats.average)?;

        tracing::debug!(
            max_time_ns = params.max_time_ns,
            warm_up_ns = params.warm_up_ns,
            noise_floor_ns = params.noise_floor_ns,
            "sampling"
        );

        let raw = gather(clock, &params, measured);
        let result = reduce(&raw, self.config.calls_per_unit, self.config.unit);
        let runtime_ns = clock.now_ns().saturating_sub(started);

        tracing::debug!(
            mean = result.mean,
            deviation = result.deviation,
            batch_size = result.batch_size,
            iters = result.iters,
            unit = result.unit.suffix(),
            "benchmark finished"
        );

        Ok(BenchReport {
            result,
            metadata: Metadata {
                clock: clock_stats,
                noise_floor_ns: params.noise_floor_ns,
                batch_count: raw.batch_count,
                rejected_batches: raw.rejected_batches,
                runtime_secs: runtime_ns as f64 / SECOND_NANOSECONDS as f64,
            },
        })
    }
}
