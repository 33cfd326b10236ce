//! Self-check thresholds.
//!
//! # Clock Check
//!
//! The SysTick clock and the DWT counter time the same busy loop. The loop
//! must run long enough to cross several SysTick wraps, otherwise the wrap
//! accounting is never exercised.
//!
//! # Stack Check
//!
//! A routine with a known local array is measured; the result must cover the
//! array and stay within a small frame overhead above it.

use bench_common::config::SYSTICK_PERIOD;

/// Largest accepted difference between SysTick and DWT spans, in cycles.
/// Covers the few instructions between the two pairs of reads.
pub const CLOCK_TOLERANCE_CYCLES: u64 = 256;

/// SysTick wraps the clock check must span.
pub const CLOCK_CHECK_MIN_WRAPS: u64 = 2;

/// Busy-loop iterations for the clock check. Each iteration takes at least
/// one cycle, so this spans at least [`CLOCK_CHECK_MIN_WRAPS`] periods.
pub const CLOCK_CHECK_ITERATIONS: u32 = (CLOCK_CHECK_MIN_WRAPS * SYSTICK_PERIOD) as u32;

/// Bytes of frame overhead allowed above the known array.
pub const STACK_SLACK_BYTES: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterations_cover_min_wraps() {
        assert!(u64::from(CLOCK_CHECK_ITERATIONS) >= CLOCK_CHECK_MIN_WRAPS * SYSTICK_PERIOD);
    }

    #[test]
    fn test_tolerance_below_one_period() {
        assert!(CLOCK_TOLERANCE_CYCLES < SYSTICK_PERIOD);
    }
}
