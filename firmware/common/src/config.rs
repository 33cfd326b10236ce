//! Measurement configuration constants.
//!
//! Everything here is fixed at compile time. Board crates pick a
//! [`ClockMode`] through cargo features and build their timer and memory
//! bounds around these values.

// =============================================================================
// SysTick Configuration
// =============================================================================

/// Width of the SysTick countdown register in bits.
pub const SYSTICK_BITS: u32 = 24;

/// SysTick reload value. The counter runs `SYSTICK_RELOAD..=0` and reloads.
pub const SYSTICK_RELOAD: u32 = (1 << SYSTICK_BITS) - 1;

/// Cycles per SysTick period (one wrap interrupt per period).
pub const SYSTICK_PERIOD: u64 = SYSTICK_RELOAD as u64 + 1;

// =============================================================================
// Stack Probe Configuration
// =============================================================================

/// Word painted over free stack before a measured call.
///
/// Any value works as long as genuine stack contents are unlikely to equal it.
pub const STACK_SENTINEL: u32 = 0xDEAD_BEEF;

/// Granularity of painting and scanning, in bytes.
pub const WORD_SIZE: usize = core::mem::size_of::<u32>();

// =============================================================================
// Clock Modes
// =============================================================================

/// System clock profile the benchmarks run under.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ClockMode {
    /// Stock clock, used when throughput matters more than comparable numbers.
    Fast,
    /// Low clock so memory latency does not dominate cycle counts.
    #[default]
    Benchmark,
}

impl ClockMode {
    /// Core clock frequency in Hz for this profile.
    pub const fn freq_hz(self) -> u32 {
        match self {
            Self::Fast => 150_000_000,
            Self::Benchmark => 24_000_000,
        }
    }

    /// Short label for report headers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Benchmark => "benchmark",
        }
    }
}

// =============================================================================
// Reporting Configuration
// =============================================================================

/// Number of trial records kept by the result log.
pub const RESULT_LOG_CAPACITY: usize = 16;

/// Maximum characters per formatted report line.
pub const REPORT_LINE_LEN: usize = 96;

/// Printed in place of a cycle count when no cycle-accurate clock exists.
pub const NOT_MEANINGFUL: &str = "[cycle counts not meaningful in qemu emulation]";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_systick_constants() {
        assert_eq!(SYSTICK_RELOAD, 0xFF_FFFF);
        assert_eq!(SYSTICK_PERIOD, 16_777_216);
    }

    #[test]
    fn test_clock_modes() {
        assert_eq!(ClockMode::default(), ClockMode::Benchmark);
        assert_eq!(ClockMode::Benchmark.freq_hz(), 24_000_000);
        assert_eq!(ClockMode::Fast.freq_hz(), 150_000_000);
        assert_eq!(ClockMode::Fast.label(), "fast");
    }
}
