//! Statistical reduction of batch timings.
//!
//! This module provides:
//! - Conversion of raw batch sums to per-call mean, deviation, min and max
//! - Time-unit constants and conversions

mod reduce;
mod units;

pub use reduce::reduce;
pub use units::{
    duration_to_ns, TimeUnit, MICROSECOND_NANOSECONDS, MILLISECOND_NANOSECONDS,
    SECOND_MICROSECONDS, SECOND_MILLISECONDS, SECOND_NANOSECONDS,
};
