//! Time-unit constants and conversions.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Milliseconds per second.
pub const SECOND_MILLISECONDS: i64 = 1_000;
/// Microseconds per second.
pub const SECOND_MICROSECONDS: i64 = 1_000_000;
/// Nanoseconds per second.
pub const SECOND_NANOSECONDS: i64 = 1_000_000_000;
/// Nanoseconds per millisecond.
pub const MILLISECOND_NANOSECONDS: i64 = SECOND_NANOSECONDS / SECOND_MILLISECONDS;
/// Nanoseconds per microsecond.
pub const MICROSECOND_NANOSECONDS: i64 = SECOND_NANOSECONDS / SECOND_MICROSECONDS;

/// Unit in which reduced statistics are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Nanoseconds.
    Nanoseconds,
    /// Microseconds.
    Microseconds,
    /// Milliseconds.
    #[default]
    Milliseconds,
    /// Seconds.
    Seconds,
}

impl TimeUnit {
    /// Width of one unit in nanoseconds.
    pub const fn nanos(self) -> i64 {
        match self {
            Self::Nanoseconds => 1,
            Self::Microseconds => MICROSECOND_NANOSECONDS,
            Self::Milliseconds => MILLISECOND_NANOSECONDS,
            Self::Seconds => SECOND_NANOSECONDS,
        }
    }

    /// Short suffix for display ("ns", "µs", "ms", "s").
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "\u{00B5}s",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
        }
    }

    /// Convert a value expressed in `self` into `other`.
    pub fn convert(self, value: f64, other: TimeUnit) -> f64 {
        value * self.nanos() as f64 / other.nanos() as f64
    }

    /// Pick the coarsest unit in which `ns` is still at least 1.
    pub fn auto(ns: f64) -> Self {
        let ns = ns.abs();
        if ns >= SECOND_NANOSECONDS as f64 {
            Self::Seconds
        } else if ns >= MILLISECOND_NANOSECONDS as f64 {
            Self::Milliseconds
        } else if ns >= MICROSECOND_NANOSECONDS as f64 {
            Self::Microseconds
        } else {
            Self::Nanoseconds
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Convert a duration to signed nanoseconds, or `None` if it does not fit in `i64`.
pub fn duration_to_ns(duration: Duration) -> Option<i64> {
    i64::try_from(duration.as_nanos()).ok()
}
