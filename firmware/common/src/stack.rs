//! Stack high-water-mark probe based on memory painting.
//!
//! [`StackProbe::spraystack`] records the current stack pointer and paints
//! every word between the low-water boundary (end of static data / heap) and
//! that pointer with [`STACK_SENTINEL`]. After the measured call returns,
//! [`StackProbe::checkstack`] scans upward from the boundary for the first
//! word that no longer holds the sentinel. The distance from that word to the
//! recorded pointer is the deepest the call reached.
//!
//! # Accuracy
//!
//! - A routine that leaves the sentinel value behind in memory it used is
//!   under-reported at that point; the chosen constant makes this unlikely but
//!   not impossible.
//! - A routine that zeroes or rewrites its dead stack is still counted, since
//!   any non-sentinel word marks the region as touched; a routine that
//!   restores the sentinel defeats the probe.
//! - Interrupt handlers that run on the same stack during the window leave
//!   their frames in the painted region and inflate the result.
//!
//! # Platform Boundary
//!
//! All machine-specific work sits behind [`StackPlatform`]: reading the stack
//! pointer, filling a range and scanning a range. Implementations must be
//! `#[inline(always)]` and must not touch the stack below the caller's frame,
//! otherwise the probe paints over (or measures) its own frames.

use crate::config::{STACK_SENTINEL, WORD_SIZE};

// =============================================================================
// Platform Abstraction
// =============================================================================

/// Machine-specific primitives used by [`StackProbe`].
pub trait StackPlatform {
    /// Lowest address the stack may grow into.
    fn low_water(&self) -> usize;

    /// Current stack pointer.
    fn stack_pointer(&self) -> usize;

    /// Write `pattern` to every word in `[low, high)`.
    ///
    /// # Safety
    ///
    /// The range must be word aligned and hold no live data, i.e. lie between
    /// the low-water boundary and the current stack pointer.
    unsafe fn fill(
        &self,
        low: usize,
        high: usize,
        pattern: u32,
    );

    /// Address of the first word in `[low, high)` not equal to `pattern`,
    /// scanning upward, or `high` if every word matches.
    ///
    /// # Safety
    ///
    /// The range must be word aligned and readable.
    unsafe fn first_mismatch(
        &self,
        low: usize,
        high: usize,
        pattern: u32,
    ) -> usize;
}

impl<P: StackPlatform> StackPlatform for &P {
    #[inline(always)]
    fn low_water(&self) -> usize { (*self).low_water() }

    #[inline(always)]
    fn stack_pointer(&self) -> usize { (*self).stack_pointer() }

    #[inline(always)]
    unsafe fn fill(
        &self,
        low: usize,
        high: usize,
        pattern: u32,
    ) {
        // SAFETY: forwarded contract.
        unsafe { (*self).fill(low, high, pattern) }
    }

    #[inline(always)]
    unsafe fn first_mismatch(
        &self,
        low: usize,
        high: usize,
        pattern: u32,
    ) -> usize {
        // SAFETY: forwarded contract.
        unsafe { (*self).first_mismatch(low, high, pattern) }
    }
}

#[inline(always)]
const fn align_up(addr: usize) -> usize { (addr + WORD_SIZE - 1) & !(WORD_SIZE - 1) }

#[inline(always)]
const fn align_down(addr: usize) -> usize { addr & !(WORD_SIZE - 1) }

// =============================================================================
// Stack Probe
// =============================================================================

/// Paint-and-scan stack usage probe.
///
/// Owns the recorded stack pointer of the current measurement window. One
/// probe per stack; the window is `spraystack`, the measured call, then
/// `checkstack`, with nothing else using the stack in between.
pub struct StackProbe<P> {
    platform: P,
    high: Option<usize>,
}

impl<P: StackPlatform> StackProbe<P> {
    /// Create a probe over `platform`.
    ///
    /// # Safety
    ///
    /// `platform.low_water()` must be the lowest address reserved for the
    /// stack: everything from it up to the stack pointer is overwritten by
    /// [`spraystack`](Self::spraystack).
    pub const unsafe fn new(platform: P) -> Self {
        Self { platform, high: None }
    }

    /// Paint the free stack below the caller's frame with the sentinel.
    ///
    /// Call from the same function that makes the measured call, directly
    /// before it. Destroys everything below the current frame.
    #[inline(always)]
    pub fn spraystack(&mut self) {
        let high = align_down(self.platform.stack_pointer());
        let low = align_up(self.platform.low_water());
        self.high = Some(high);

        if high > low {
            // SAFETY: [low, high) lies between the boundary vouched for in `new`
            // and the current stack pointer, so nothing in it is live.
            unsafe { self.platform.fill(low, high, STACK_SENTINEL) };
        }
    }

    /// Bytes of stack used by the call since the last `spraystack`.
    ///
    /// Returns 0 when nothing below the recorded pointer was touched. Reading
    /// twice without further stack use gives the same value.
    #[inline(always)]
    pub fn checkstack(&self) -> usize {
        debug_assert!(self.high.is_some(), "checkstack without a preceding spraystack");
        let Some(high) = self.high else {
            return 0;
        };
        let low = align_up(self.platform.low_water());
        if high <= low {
            return 0;
        }

        // SAFETY: the same range was painted by `spraystack` and is readable.
        let first = unsafe { self.platform.first_mismatch(low, high, STACK_SENTINEL) };
        high - first
    }

    /// Distance from the current stack pointer down to the low-water boundary.
    ///
    /// Independent of painting; an upper bound on what any call may use.
    #[inline(always)]
    pub fn get_untouched_headroom(&self) -> usize {
        self.platform.stack_pointer().saturating_sub(self.platform.low_water())
    }

    #[cfg(test)]
    fn platform(&self) -> &P { &self.platform }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimStack;

    const RAM_WORDS: usize = 1024;
    const BASE: usize = 0x2000_0000;

    fn probe() -> StackProbe<SimStack> {
        // SAFETY: the simulated RAM is owned by the platform.
        unsafe { StackProbe::new(SimStack::new(BASE, RAM_WORDS)) }
    }

    #[test]
    fn test_alignment_helpers() {
        assert_eq!(align_up(0x1001), 0x1004);
        assert_eq!(align_up(0x1004), 0x1004);
        assert_eq!(align_down(0x1007), 0x1004);
    }

    #[test]
    fn test_spray_then_check_is_zero() {
        let mut probe = probe();
        probe.spraystack();
        assert_eq!(probe.checkstack(), 0);
    }

    #[test]
    fn test_spray_paints_below_stack_pointer_only() {
        let mut probe = probe();
        let sp = probe.platform().stack_pointer();
        probe.platform().poke(sp, 0x1234_5678);
        probe.spraystack();

        assert_eq!(probe.platform().peek(sp - WORD_SIZE), STACK_SENTINEL);
        assert_eq!(probe.platform().peek(BASE), STACK_SENTINEL);
        assert_eq!(probe.platform().peek(sp), 0x1234_5678);
        assert_eq!(probe.high, Some(sp));
    }

    #[test]
    fn test_call_writing_n_bytes() {
        const OVERHEAD: usize = 8;
        for n in [4usize, 20, 64, 256, 1000] {
            let mut probe = probe();
            probe.spraystack();
            probe.platform().call(OVERHEAD, n);
            let used = probe.checkstack();
            assert!(used >= n, "n={n}: measured {used}");
            assert!(used < n + OVERHEAD + WORD_SIZE, "n={n}: measured {used}");
        }
    }

    #[test]
    fn test_partial_word_counts_whole_word() {
        let mut probe = probe();
        probe.spraystack();
        probe.platform().call(0, 3);
        assert_eq!(probe.checkstack(), WORD_SIZE);
    }

    #[test]
    fn test_checkstack_is_idempotent() {
        let mut probe = probe();
        probe.spraystack();
        probe.platform().call(8, 128);
        let first = probe.checkstack();
        assert_eq!(probe.checkstack(), first);
    }

    #[test]
    fn test_deepest_point_wins() {
        let mut probe = probe();
        probe.spraystack();
        probe.platform().call(8, 512);
        probe.platform().call(8, 32);
        assert_eq!(probe.checkstack(), 8 + 512);
    }

    #[test]
    fn test_zeroed_dead_stack_still_counts() {
        let mut probe = probe();
        probe.spraystack();
        probe.platform().call_and_zero(16, 200);
        assert_eq!(probe.checkstack(), 216);
    }

    #[test]
    fn test_sentinel_left_at_deepest_word_is_missed() {
        let mut probe = probe();
        probe.spraystack();
        probe.platform().call(8, 64);
        let deepest = probe.platform().stack_pointer() - 8 - 64;
        probe.platform().poke(deepest, STACK_SENTINEL);
        assert_eq!(probe.checkstack(), 8 + 64 - WORD_SIZE);
    }

    #[test]
    fn test_respray_resets_window() {
        let mut probe = probe();
        probe.spraystack();
        probe.platform().call(8, 400);
        assert_eq!(probe.checkstack(), 408);

        probe.spraystack();
        probe.platform().call(8, 40);
        assert_eq!(probe.checkstack(), 48);
    }

    #[test]
    fn test_exhausted_region_reports_everything() {
        let mut probe = probe();
        probe.spraystack();
        let headroom = probe.get_untouched_headroom();
        probe.platform().call(0, headroom);
        assert_eq!(probe.checkstack(), headroom);
    }

    #[test]
    fn test_headroom_tracks_stack_pointer() {
        let probe = probe();
        let sp = probe.platform().stack_pointer();
        assert_eq!(probe.get_untouched_headroom(), sp - BASE);

        probe.platform().set_stack_pointer(BASE + 64);
        assert_eq!(probe.get_untouched_headroom(), 64);
    }

    #[test]
    fn test_stack_pointer_at_boundary() {
        let mut probe = probe();
        probe.platform().set_stack_pointer(BASE);
        probe.spraystack();
        assert_eq!(probe.checkstack(), 0);
        assert_eq!(probe.get_untouched_headroom(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "checkstack without a preceding spraystack")]
    fn test_check_without_spray_asserts() {
        let probe = probe();
        let _ = probe.checkstack();
    }
}
