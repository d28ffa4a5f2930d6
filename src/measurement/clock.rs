//! Monotonic clock sources.
//!
//! The harness reads time through the [`Clock`] trait so the measurement loop
//! can run against the platform timer in production and against a
//! deterministic stub in tests:
//! - [`MonotonicClock`]: `std::time::Instant`, anchored when the clock is created
//! - [`ManualClock`]: caller-driven time for reproducible scenarios

use std::cell::Cell;
use std::time::Instant;

/// A monotonic timestamp source with nanosecond semantics.
///
/// Reads are infallible. Only differences between two readings of the same
/// clock are meaningful.
pub trait Clock {
    /// Current timestamp in nanoseconds.
    fn now_ns(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_ns(&self) -> u64 {
        (**self).now_ns()
    }
}

/// Wall-clock timer backed by `std::time::Instant`.
///
/// Timestamps are reported relative to the moment the clock was created, so
/// each benchmark invocation owns its own reference point instead of sharing
/// a lazily-initialised global.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_ns(&self) -> u64 {
        // u64 nanoseconds cover ~584 years of uptime.
        self.origin.elapsed().as_nanos() as u64
    }
}

/// Deterministic clock for tests and simulations.
///
/// Every read returns the current time and then advances it by `step`.
/// Code under measurement can also move time forward explicitly with
/// [`advance`](Self::advance), which is how a measured closure simulates a
/// fixed per-call cost:
///
/// ```
/// use microbench::measurement::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let before = clock.now_ns();
/// clock.advance(1_000);
/// assert_eq!(clock.now_ns() - before, 1_000);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
    step: u64,
}

impl ManualClock {
    /// Create a clock frozen at zero.
    pub fn new() -> Self {
        Self::with_step(0)
    }

    /// Create a clock that advances by `step_ns` on every read.
    pub fn with_step(step_ns: u64) -> Self {
        Self {
            now: Cell::new(0),
            step: step_ns,
        }
    }

    /// Move the clock forward by `ns` nanoseconds.
    #[inline]
    pub fn advance(&self, ns: u64) {
        self.now.set(self.now.get().saturating_add(ns));
    }

    /// Current time without triggering the per-read step.
    pub fn peek(&self) -> u64 {
        self.now.get()
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_ns(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now.saturating_add(self.step));
        now
    }
}

/// Time a single invocation of `f` on `clock`, in nanoseconds.
#[inline]
pub fn elapsed_ns<C, F, T>(clock: &C, f: F) -> u64
where
    C: Clock + ?Sized,
    F: FnOnce() -> T,
{
    let from = clock.now_ns();
    super::do_not_optimize(f());
    clock.now_ns().saturating_sub(from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let mut last = clock.now_ns();
        for _ in 0..1000 {
            let now = clock.now_ns();
            assert!(now >= last, "clock went backwards: {} -> {}", last, now);
            last = now;
        }
    }

    #[test]
    fn test_manual_clock_steps_on_read() {
        let clock = ManualClock::with_step(50);
        assert_eq!(clock.now_ns(), 0);
        assert_eq!(clock.now_ns(), 50);
        assert_eq!(clock.peek(), 100);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        clock.advance(7);
        clock.advance(3);
        assert_eq!(clock.now_ns(), 10);
        assert_eq!(clock.now_ns(), 10);
    }

    #[test]
    fn test_elapsed_ns_with_manual_clock() {
        let clock = ManualClock::new();
        let ns = elapsed_ns(&clock, || clock.advance(1_234));
        assert_eq!(ns, 1_234);
    }

    #[test]
    fn test_clock_through_reference() {
        fn read<C: Clock>(c: C) -> u64 {
            c.now_ns()
        }
        let clock = ManualClock::with_step(5);
        read(&clock);
        assert_eq!(read(&clock), 5);
    }
}
