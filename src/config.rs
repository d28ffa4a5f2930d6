//! Configuration for benchmark runs.

use std::time::Duration;

use crate::error::ConfigError;
use crate::measurement::{SamplerParams, CALIBRATION_SAMPLES, WARM_UP_SAMPLES};
use crate::statistics::{duration_to_ns, TimeUnit};

/// Configuration options for [`Bencher`](crate::Bencher).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Total time budget for sampling (default: 1 s).
    pub max_time: Duration,

    /// Warm-up phase whose samples are discarded (default: derived).
    ///
    /// `None` derives `max_time / 20 + 1 ms` in whole milliseconds. A zero warm-up, or one not
    /// shorter than `max_time`, disables the separate warm-up phase.
    pub warm_up: Option<Duration>,

    /// Logical units of work performed by one call of the measured function
    /// (default: 1).
    pub calls_per_unit: u64,

    /// Target batch duration as a multiple of the clock's read gap
    /// (default: 5). Zero disables coalescing.
    pub noise_floor_multiple: u64,

    /// Minimum calls per batch (default: 1).
    pub min_batch_size: u64,

    /// Minimum deadline checks left after resizing (default: 5).
    pub min_end_checks: u64,

    /// Clock reads in the discarded calibration pass (default: 100).
    pub calibration_warm_up_samples: u64,

    /// Clock reads in the calibration pass that is kept (default: 1,000).
    pub calibration_samples: u64,

    /// Unit of the reported figures (default: milliseconds).
    pub unit: TimeUnit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_time: Duration::from_secs(1),
            warm_up: None,
            calls_per_unit: 1,
            noise_floor_multiple: 5,
            min_batch_size: 1,
            min_end_checks: 5,
            calibration_warm_up_samples: WARM_UP_SAMPLES,
            calibration_samples: CALIBRATION_SAMPLES,
            unit: TimeUnit::Milliseconds,
        }
    }
}

impl Config {
    /// Warm-up duration after applying the default derivation.
    ///
    /// The derived value is `max_time / 20` truncated to whole milliseconds,
    /// plus 1 ms.
    pub fn effective_warm_up(&self) -> Duration {
        self.warm_up.unwrap_or_else(|| {
            let twentieth_ms = u64::try_from(self.max_time.as_millis() / 20).unwrap_or(u64::MAX);
            Duration::from_millis(twentieth_ms.saturating_add(1))
        })
    }

    /// Check every parameter without running anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.calls_per_unit == 0 {
            return Err(ConfigError::ZeroCallsPerUnit);
        }
        if self.min_batch_size == 0 {
            return Err(ConfigError::ZeroMinBatchSize);
        }
        if self.min_end_checks == 0 {
            return Err(ConfigError::ZeroMinEndChecks);
        }
        if self.calibration_samples == 0 {
            return Err(ConfigError::ZeroCalibrationSamples);
        }
        time_ns("max_time", self.max_time)?;
        time_ns("warm_up", self.effective_warm_up())?;
        Ok(())
    }

    /// Sampler parameters for a measured noise floor.
    ///
    /// Validates first, so the sampler's own preconditions always hold.
    pub(crate) fn sampler_params(&self, clock_average_ns: i64) -> Result<SamplerParams, ConfigError> {
        self.validate()?;
        let multiple = i64::try_from(self.noise_floor_multiple).unwrap_or(i64::MAX);
        Ok(SamplerParams {
            max_time_ns: time_ns("max_time", self.max_time)?,
            warm_up_ns: time_ns("warm_up", self.effective_warm_up())?,
            noise_floor_ns: multiple.saturating_mul(clock_average_ns),
            min_batch_size: self.min_batch_size,
            min_end_checks: self.min_end_checks,
        })
    }
}

fn time_ns(name: &'static str, duration: Duration) -> Result<i64, ConfigError> {
    duration_to_ns(duration).ok_or(ConfigError::TimeOutOfRange {
        name,
        secs: duration.as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_derived_warm_up() {
        let config = Config {
            max_time: Duration::from_millis(100),
            ..Config::default()
        };
        assert_eq!(config.effective_warm_up(), Duration::from_millis(6));
    }

    #[test]
    fn test_derived_warm_up_truncates_to_whole_millis() {
        let cases = [(30, 2), (59, 3), (19, 1), (1_010, 51)];
        for (max_ms, warm_up_ms) in cases {
            let config = Config {
                max_time: Duration::from_millis(max_ms),
                ..Config::default()
            };
            assert_eq!(
                config.effective_warm_up(),
                Duration::from_millis(warm_up_ms),
                "max_time = {} ms",
                max_ms
            );
        }

        // sub-millisecond parts of the budget are ignored too
        let config = Config {
            max_time: Duration::from_micros(40_999),
            ..Config::default()
        };
        assert_eq!(config.effective_warm_up(), Duration::from_millis(3));
    }

    #[test]
    fn test_explicit_warm_up_wins() {
        let config = Config {
            warm_up: Some(Duration::ZERO),
            ..Config::default()
        };
        assert_eq!(config.effective_warm_up(), Duration::ZERO);
    }

    #[test]
    fn test_rejects_zero_parameters() {
        let cases = [
            (
                Config { calls_per_unit: 0, ..Config::default() },
                ConfigError::ZeroCallsPerUnit,
            ),
            (
                Config { min_batch_size: 0, ..Config::default() },
                ConfigError::ZeroMinBatchSize,
            ),
            (
                Config { min_end_checks: 0, ..Config::default() },
                ConfigError::ZeroMinEndChecks,
            ),
            (
                Config { calibration_samples: 0, ..Config::default() },
                ConfigError::ZeroCalibrationSamples,
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_rejects_overflowing_budget() {
        let config = Config {
            max_time: Duration::from_secs(u64::MAX / 2),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TimeOutOfRange { name: "max_time", .. })
        ));
    }

    #[test]
    fn test_sampler_params_noise_floor() {
        let config = Config {
            max_time: Duration::from_millis(100),
            warm_up: Some(Duration::from_millis(5)),
            noise_floor_multiple: 5,
            ..Config::default()
        };
        let params = config.sampler_params(1_000).unwrap();
        assert_eq!(params.max_time_ns, 100_000_000);
        assert_eq!(params.warm_up_ns, 5_000_000);
        assert_eq!(params.noise_floor_ns, 5_000);
        assert_eq!(params.min_batch_size, 1);
        assert_eq!(params.min_end_checks, 5);
    }
}
