//! # microbench
//!
//! Statistical micro-benchmarking with adaptive batching.
//!
//! This crate measures the wall-clock cost of an operation and reports:
//! - Mean time per call
//! - Standard deviation per call
//! - Min and max, widened consistently with the deviation
//! - How many calls were coalesced per sample, and how many ran in total
//!
//! Operations that run faster than the clock can resolve are measured in
//! batches sized from a calibrated noise floor, and the batch-level
//! statistics are corrected back to per-call figures.
//!
//! ## Keep the work observable
//!
//! The harness treats the measured closure as opaque. If its result is
//! unused the optimiser may delete the work entirely, and you end up
//! timing an empty loop.
//!
//! ```ignore
//! // ❌ WRONG - the sum is dead code
//! benchmark(Duration::from_millis(100), || { data.iter().sum::<u64>(); });
//!
//! // ✅ CORRECT - the result is marked as used
//! benchmark(Duration::from_millis(100), || {
//!     do_not_optimize(data.iter().sum::<u64>());
//! });
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Duration;
//! use microbench::{benchmark, do_not_optimize};
//!
//! let words = ["alpha", "beta", "gamma"];
//! let result = benchmark(Duration::from_millis(20), || {
//!     do_not_optimize(words.iter().map(|w| w.len()).sum::<usize>());
//! })
//! .unwrap();
//!
//! println!("{:.6} {} ± {:.6}", result.mean, result.unit, result.deviation);
//! ```
//!
//! ## Rejecting batches
//!
//! A measured closure may return `bool`. Returning `false` from any call
//! discards the timing of the whole batch it belongs to, while the elapsed
//! time still counts towards the budget.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod bencher;
mod config;
mod error;
mod result;

// Functional modules
pub mod measurement;
pub mod output;
pub mod statistics;

use std::time::Duration;

// Re-exports for public API
pub use bencher::Bencher;
pub use config::Config;
pub use error::ConfigError;
pub use measurement::{
    do_not_optimize, read_write_barrier, BatchOutcome, Clock, ClockStats, ManualClock,
    MonotonicClock, RawStats,
};
pub use result::{BenchReport, BenchResult, Metadata};
pub use statistics::TimeUnit;

/// Benchmark `measured` for up to `max_time`, deriving the warm-up.
///
/// The warm-up is `max_time / 20 + 1 ms`, in whole milliseconds. Results are in milliseconds.
///
/// # Errors
///
/// Returns an error if `max_time` does not fit in signed 64-bit nanoseconds.
pub fn benchmark<F, O>(max_time: Duration, measured: F) -> Result<BenchResult, ConfigError>
where
    F: FnMut() -> O,
    O: BatchOutcome,
{
    Bencher::new()
        .max_time(max_time)
        .run(measured)
        .map(|report| report.result)
}

/// Benchmark `measured` for up to `max_time` with an explicit warm-up.
///
/// # Errors
///
/// Returns an error if either duration does not fit in signed 64-bit nanoseconds.
pub fn benchmark_with_warm_up<F, O>(
    max_time: Duration,
    warm_up: Duration,
    measured: F,
) -> Result<BenchResult, ConfigError>
where
    F: FnMut() -> O,
    O: BatchOutcome,
{
    Bencher::new()
        .max_time(max_time)
        .warm_up(warm_up)
        .run(measured)
        .map(|report| report.result)
}
