//! Measurement infrastructure.
//!
//! This module provides:
//! - Clock sources behind the [`Clock`] trait
//! - Optimisation barriers for measured code
//! - Noise-floor calibration from back-to-back clock reads
//! - The adaptive batch sampler
//!
//! # Batching
//!
//! A function that runs faster than the clock can resolve is measured in
//! batches: many consecutive calls timed as one sample. The sampler starts
//! with small batches, and once the warm-up phase ends it re-sizes them so
//! that each batch lasts comfortably longer than the calibrated noise floor.

mod barrier;
mod calibration;
mod clock;
mod sampler;

pub use barrier::{do_not_optimize, read_write_barrier};
pub use calibration::{
    calibrate, calibrate_with_warm_up, ClockStats, CALIBRATION_SAMPLES, WARM_UP_SAMPLES,
};
pub use clock::{elapsed_ns, Clock, ManualClock, MonotonicClock};
pub use sampler::{gather, BatchOutcome, RawStats, SamplerParams};
