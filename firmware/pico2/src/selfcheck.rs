//! On-target checks of the instrumentation itself.
//!
//! Run after the benchmarks; a failed check fails the run like a known-answer
//! mismatch does.

use core::fmt;

use bench_common::config::SYSTICK_PERIOD;

use crate::config::{CLOCK_CHECK_MIN_WRAPS, CLOCK_TOLERANCE_CYCLES, STACK_SLACK_BYTES};

// =============================================================================
// Clock Check
// =============================================================================

/// SysTick clock span compared against the DWT counter over the same work.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClockCheck {
    /// Span measured by the SysTick clock.
    pub systick: u64,
    /// Span measured by DWT CYCCNT.
    pub reference: u64,
}

impl ClockCheck {
    pub const fn new(
        systick: u64,
        reference: u64,
    ) -> Self {
        Self { systick, reference }
    }

    /// Absolute difference between the two spans.
    pub const fn deviation(&self) -> u64 { self.systick.abs_diff(self.reference) }

    /// Whether the span crossed enough SysTick wraps to exercise the wrap count.
    pub const fn spanned_wraps(&self) -> bool { self.systick >= CLOCK_CHECK_MIN_WRAPS * SYSTICK_PERIOD }

    pub const fn passed(&self) -> bool { self.spanned_wraps() && self.deviation() <= CLOCK_TOLERANCE_CYCLES }
}

impl fmt::Display for ClockCheck {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "clock check: systick {} vs dwt {} cycles (deviation {})",
            self.systick,
            self.reference,
            self.deviation()
        )
    }
}

// =============================================================================
// Stack Check
// =============================================================================

/// Measured stack use of a routine with a known frame size.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StackCheck {
    /// Bytes the probe reported.
    pub measured: usize,
    /// Bytes the routine is known to write.
    pub expected: usize,
}

impl StackCheck {
    pub const fn new(
        measured: usize,
        expected: usize,
    ) -> Self {
        Self { measured, expected }
    }

    pub const fn passed(&self) -> bool {
        self.measured >= self.expected && self.measured < self.expected + STACK_SLACK_BYTES
    }
}

impl fmt::Display for StackCheck {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "stack check: measured {} bytes for a {} byte array",
            self.measured, self.expected
        )
    }
}

/// Verdict word for a check line.
pub const fn verdict(passed: bool) -> &'static str {
    if passed { "ok" } else { "FAILED" }
}

// =============================================================================
// Tests
// =============================================================================
