//! Board and clock configuration.
//!
//! The clock profile is picked with cargo features:
//! - default: 24 MHz benchmark clock
//! - `clock-fast`: stock 150 MHz
//!
//! `emulated` marks a build for an emulator, where cycle counts are reported
//! as not meaningful.

use bench_common::config::ClockMode;

// =============================================================================
// Clock
// =============================================================================

/// Clock profile this build runs under.
#[cfg(feature = "clock-fast")]
pub const CLOCK_MODE: ClockMode = ClockMode::Fast;

/// Clock profile this build runs under.
#[cfg(not(feature = "clock-fast"))]
pub const CLOCK_MODE: ClockMode = ClockMode::Benchmark;

/// Core clock frequency in Hz.
pub const CORE_FREQ_HZ: u32 = CLOCK_MODE.freq_hz();

/// Whether cycle counts come from an emulator.
pub const EMULATED: bool = cfg!(feature = "emulated");

// =============================================================================
// Report Output
// =============================================================================

/// Baud rate of the report UART (UART0, TX on GPIO0).
pub const UART_BAUD: u32 = 115_200;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_freq_matches_mode() {
        assert_eq!(CORE_FREQ_HZ, CLOCK_MODE.freq_hz());
    }

    #[test]
    #[cfg(not(feature = "clock-fast"))]
    fn test_default_is_benchmark_clock() {
        assert_eq!(CLOCK_MODE, ClockMode::Benchmark);
        assert_eq!(CORE_FREQ_HZ, 24_000_000);
    }
}
