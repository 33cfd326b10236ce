//! SysTick as the wrapping countdown behind the cycle clock.
//!
//! SysTick runs from the core clock with the full 24-bit reload, so one wrap
//! happens every 2^24 cycles. The exception handler (in the binary) calls
//! [`OVERFLOWS`]`.record_wrap()` and nothing else writes the counter.
//!
//! Reading the clock with interrupts masked is a bug: a pending wrap would be
//! missed and the reading would jump back by one period.

use bench_common::OverflowCounter;
#[cfg(target_arch = "arm")]
use bench_common::MonotonicClock;

/// Wraps counted by the SysTick exception.
pub static OVERFLOWS: OverflowCounter = OverflowCounter::new();

/// Clock over the hardware SysTick and [`OVERFLOWS`].
#[cfg(target_arch = "arm")]
pub fn clock() -> MonotonicClock<'static, SysTickTimer> { MonotonicClock::new(SysTickTimer, &OVERFLOWS) }

/// Handle to the SysTick current value register.
#[derive(Clone, Copy, Debug, Default)]
pub struct SysTickTimer;

#[cfg(target_arch = "arm")]
mod hw {
    use bench_common::CountdownTimer;
    use bench_common::config::SYSTICK_RELOAD;
    use cortex_m::peripheral::SYST;
    use cortex_m::peripheral::syst::SystClkSource;

    use super::SysTickTimer;

    /// Start SysTick counting core cycles with the wrap interrupt enabled.
    ///
    /// Takes the peripheral so nothing else can reprogram it.
    pub fn init(mut syst: SYST) {
        syst.disable_counter();
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(SYSTICK_RELOAD);
        syst.clear_current();
        syst.enable_interrupt();
        syst.enable_counter();
    }

    impl CountdownTimer for SysTickTimer {
        const MAX: u32 = SYSTICK_RELOAD;

        #[inline]
        fn current(&self) -> u32 {
            debug_assert!(
                cortex_m::register::primask::read().is_inactive(),
                "SysTick clock read with interrupts masked"
            );
            let value = SYST::get_current();
            // a wrap that fired during the read is taken before the re-snapshot
            cortex_m::asm::isb();
            value
        }
    }
}

#[cfg(target_arch = "arm")]
pub use hw::init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflows_start_at_zero() {
        assert_eq!(OVERFLOWS.snapshot(), 0);
    }
}
