//! Monotonic cycle clock on top of a wrapping countdown timer.
//!
//! The hardware timer counts down from its reload value to zero, reloads, and
//! raises one interrupt per reload. The interrupt handler bumps an
//! [`OverflowCounter`]; [`MonotonicClock::get_time`] combines that count with
//! the live timer value into a 64-bit "cycles since boot".
//!
//! # Race Handling
//!
//! The timer keeps moving while it is read, and the wrap count can change
//! between the two reads. `get_time` reads the wrap count, then the timer,
//! then the wrap count again. If the count moved, the timer sample may belong
//! to either period, so the candidate is discarded and the whole sequence is
//! repeated. Each retry corresponds to a real wrap, so the loop terminates.
//!
//! No lock is taken and interrupts stay enabled: the handler is the only
//! writer and its increment is a single store that is never observed torn.
//! On a core without that guarantee the counter must stay an atomic.

use core::sync::atomic::{AtomicU32, Ordering, compiler_fence};

// =============================================================================
// Timer Abstraction
// =============================================================================

/// A free-running countdown register with auto-reload.
pub trait CountdownTimer {
    /// Reload value. The register runs `MAX..=0` and then reloads to `MAX`.
    const MAX: u32;

    /// Current register value.
    fn current(&self) -> u32;
}

impl<T: CountdownTimer> CountdownTimer for &T {
    const MAX: u32 = T::MAX;

    #[inline]
    fn current(&self) -> u32 { (*self).current() }
}

// =============================================================================
// Overflow Counter
// =============================================================================

/// Number of timer wraps since start-up.
///
/// Single writer: only the wrap interrupt handler may call [`record_wrap`].
/// Any number of readers may call [`snapshot`]. There is no reset.
///
/// [`record_wrap`]: OverflowCounter::record_wrap
/// [`snapshot`]: OverflowCounter::snapshot
pub struct OverflowCounter {
    wraps: AtomicU32,
}

impl OverflowCounter {
    /// Create a counter at zero wraps.
    pub const fn new() -> Self {
        Self {
            wraps: AtomicU32::new(0),
        }
    }

    /// Count one wrap. Call from the wrap interrupt handler only.
    #[inline]
    pub fn record_wrap(&self) {
        // Armv6-M has no `fetch_add`; with a single writer load + store is enough
        self.wraps.store(self.wraps.load(Ordering::Relaxed).wrapping_add(1), Ordering::Relaxed);
    }

    /// Current wrap count.
    #[inline]
    pub fn snapshot(&self) -> u32 { self.wraps.load(Ordering::Relaxed) }
}

impl Default for OverflowCounter {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Monotonic Clock
// =============================================================================

/// Cycles since boot from a wrap count and a countdown sample.
///
/// `(wraps + 1) * (max + 1) - value`: the timer starts at `max` right after
/// boot, so a sample of `max` with zero wraps is one cycle in.
#[inline]
pub const fn cycles_since_boot(
    max: u32,
    wraps: u32,
    value: u32,
) -> u64 {
    (wraps as u64 + 1) * (max as u64 + 1) - value as u64
}

/// Cycles between two `get_time` readings.
#[inline]
pub const fn elapsed(
    start: u64,
    end: u64,
) -> u64 {
    end.wrapping_sub(start)
}

/// 64-bit cycle clock extended from a wrapping countdown timer.
///
/// Requires the timer to free-run from `MAX` down to zero with auto-reload,
/// and the wrap interrupt to call [`OverflowCounter::record_wrap`] exactly once
/// per reload, enabled before the first [`get_time`](Self::get_time).
/// A misconfigured timer is not detected here; it yields wrong numbers.
pub struct MonotonicClock<'a, T> {
    timer: T,
    overflows: &'a OverflowCounter,
}

impl<'a, T: CountdownTimer> MonotonicClock<'a, T> {
    /// Build a clock from a timer and the counter its interrupt maintains.
    pub const fn new(
        timer: T,
        overflows: &'a OverflowCounter,
    ) -> Self {
        Self { timer, overflows }
    }

    /// Cycles since boot.
    ///
    /// Non-decreasing across calls (up to the 64-bit horizon, or 2^32 wraps
    /// of the counter). Never built from a wrap count and timer sample taken
    /// on different sides of a wrap.
    pub fn get_time(&self) -> u64 {
        loop {
            let before = self.overflows.snapshot();
            compiler_fence(Ordering::SeqCst);
            let value = self.timer.current();
            compiler_fence(Ordering::SeqCst);
            let candidate = cycles_since_boot(T::MAX, before, value);

            if self.overflows.snapshot() == before {
                return candidate;
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
