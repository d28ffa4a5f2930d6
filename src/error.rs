//! Configuration errors.

use thiserror::Error;

/// A benchmark parameter outside its valid range.
///
/// Returned before any measurement starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `calls_per_unit` was zero.
    #[error("calls_per_unit must be at least 1")]
    ZeroCallsPerUnit,

    /// `min_batch_size` was zero.
    #[error("min_batch_size must be at least 1")]
    ZeroMinBatchSize,

    /// `min_end_checks` was zero.
    #[error("min_end_checks must be at least 1")]
    ZeroMinEndChecks,

    /// Clock calibration was asked to take no samples.
    #[error("calibration_samples must be at least 1")]
    ZeroCalibrationSamples,

    /// A time budget does not fit in signed 64-bit nanoseconds.
    #[error("{name} of {secs}s exceeds the representable range")]
    TimeOutOfRange {
        /// Which parameter overflowed.
        name: &'static str,
        /// The rejected value in whole seconds.
        secs: u64,
    },
}
