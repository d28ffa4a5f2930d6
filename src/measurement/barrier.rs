//! Optimisation barriers for measured code.
//!
//! The harness treats the measured function as an opaque callable. It is the
//! measured function's job to keep its work observable, otherwise the
//! optimiser is free to delete or hoist it out of the batch loop.

use std::hint::black_box;
use std::sync::atomic::{compiler_fence, Ordering};

/// Mark `value` as used so the compiler cannot prove it dead.
///
/// Wrap the result of the operation being measured:
///
/// ```
/// use microbench::do_not_optimize;
///
/// let data = [3u64, 1, 4, 1, 5];
/// do_not_optimize(data.iter().sum::<u64>());
/// ```
#[inline(always)]
pub fn do_not_optimize<T>(value: T) -> T {
    black_box(value)
}

/// Forbid the compiler from reordering memory reads and writes across this point.
///
/// Emits no instruction. Only compiler reordering is prevented; the CPU may
/// still reorder as its memory model allows.
#[inline(always)]
pub fn read_write_barrier() {
    compiler_fence(Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_do_not_optimize_is_identity() {
        assert_eq!(do_not_optimize(42u32), 42);
        let v = vec![1, 2, 3];
        assert_eq!(do_not_optimize(v), vec![1, 2, 3]);
    }

    #[test]
    fn test_barrier_preserves_writes() {
        let mut x = 0u64;
        for i in 0..100 {
            x = x.wrapping_add(i);
            read_write_barrier();
        }
        assert_eq!(x, 4950);
    }
}
