//! DWT cycle counter (CYCCNT) on the Cortex-M33.
//!
//! Used as an independent reference for the SysTick clock: both count core
//! cycles, but CYCCNT is a plain 32-bit up-counter with no interrupt involved.
//!
//! # Overflow Handling
//!
//! CYCCNT wraps every 2^32 cycles:
//! - 24 MHz: ~179 seconds
//! - 150 MHz: ~28.6 seconds
//!
//! [`elapsed`] uses `wrapping_sub`, so a span is correct as long as it is
//! shorter than one wrap.

/// DCB DEMCR register, TRCENA is bit 24.
#[cfg(target_arch = "arm")]
const DEMCR: *mut u32 = 0xE000_EDFC as *mut u32;

/// DWT CTRL register, CYCCNTENA is bit 0.
#[cfg(target_arch = "arm")]
const DWT_CTRL: *mut u32 = 0xE000_1000 as *mut u32;

/// DWT CYCCNT register.
#[cfg(target_arch = "arm")]
const DWT_CYCCNT: *mut u32 = 0xE000_1004 as *mut u32;

/// Enable and zero the cycle counter.
///
/// Safe to call multiple times.
pub fn init() {
    // DEMCR.TRCENA must be set before DWT registers accept writes
    #[cfg(target_arch = "arm")]
    // SAFETY: core debug registers, single writer during startup.
    unsafe {
        use core::ptr::{read_volatile, write_volatile};

        write_volatile(DEMCR, read_volatile(DEMCR) | (1 << 24));
        write_volatile(DWT_CYCCNT, 0);
        write_volatile(DWT_CTRL, read_volatile(DWT_CTRL) | 1);
    }
}

/// Read current cycle count (32-bit, wraps).
#[inline]
pub fn read() -> u32 {
    #[cfg(target_arch = "arm")]
    // SAFETY: read-only access to CYCCNT.
    unsafe {
        core::ptr::read_volatile(DWT_CYCCNT)
    }
    #[cfg(not(target_arch = "arm"))]
    {
        0 // Placeholder for tests
    }
}

/// Cycles between two reads, across at most one counter wrap.
#[inline]
pub const fn elapsed(
    start: u32,
    end: u32,
) -> u32 {
    end.wrapping_sub(start)
}

/// Milliseconds a span of `cycles` lasts at `freq_hz`, for log output.
pub const fn cycles_to_ms(
    cycles: u64,
    freq_hz: u32,
) -> u64 {
    if freq_hz == 0 {
        return 0;
    }
    cycles * 1000 / freq_hz as u64
}

// =============================================================================
// Tests
// =============================================================================
