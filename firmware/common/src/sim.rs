//! Simulated hardware for host tests.
//!
//! - [`ScriptedTimer`]: countdown timer that replays scripted samples and can
//!   fire the wrap interrupt right after a sample is taken
//! - [`SimStack`]: word-addressed RAM with a movable stack pointer

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::clock::{CountdownTimer, OverflowCounter};
use crate::config::{SYSTICK_RELOAD, WORD_SIZE};
use crate::stack::StackPlatform;

// =============================================================================
// Scripted Timer
// =============================================================================

/// One scripted timer sample.
#[derive(Clone, Copy, Debug)]
pub struct TimerStep {
    value: u32,
    wrap_after: bool,
}

impl TimerStep {
    /// Return `value` from the register.
    pub const fn read(value: u32) -> Self {
        Self {
            value,
            wrap_after: false,
        }
    }

    /// Return `value`, then run the wrap interrupt before the caller continues.
    pub const fn read_then_wrap(value: u32) -> Self {
        Self {
            value,
            wrap_after: true,
        }
    }
}

enum Mode {
    Script(VecDeque<TimerStep>),
    FreeRunning { value: u32, step: u32 },
}

/// 24-bit countdown timer driven by a script or a fixed step per read.
pub struct ScriptedTimer<'a> {
    overflows: &'a OverflowCounter,
    mode: RefCell<Mode>,
    reads: Cell<usize>,
}

impl<'a> ScriptedTimer<'a> {
    /// Replay `steps` in order; panics when the script runs out.
    pub fn new(
        overflows: &'a OverflowCounter,
        steps: &[TimerStep],
    ) -> Self {
        Self {
            overflows,
            mode: RefCell::new(Mode::Script(steps.iter().copied().collect())),
            reads: Cell::new(0),
        }
    }

    /// Start at the reload value and advance `step` cycles per read. A wrap
    /// fires right after the sample that precedes it, the worst case for a
    /// reader.
    pub fn free_running(
        overflows: &'a OverflowCounter,
        step: u32,
    ) -> Self {
        Self {
            overflows,
            mode: RefCell::new(Mode::FreeRunning {
                value: SYSTICK_RELOAD,
                step,
            }),
            reads: Cell::new(0),
        }
    }

    /// Number of register reads so far.
    pub fn reads(&self) -> usize { self.reads.get() }
}

impl CountdownTimer for ScriptedTimer<'_> {
    const MAX: u32 = SYSTICK_RELOAD;

    fn current(&self) -> u32 {
        self.reads.set(self.reads.get() + 1);
        let mut mode = self.mode.borrow_mut();
        match &mut *mode {
            Mode::Script(steps) => {
                let step = steps.pop_front().expect("timer script exhausted");
                if step.wrap_after {
                    self.overflows.record_wrap();
                }
                step.value
            }
            Mode::FreeRunning { value, step } => {
                let sample = *value;
                if *value >= *step {
                    *value -= *step;
                } else {
                    *value = SYSTICK_RELOAD - (*step - *value - 1);
                    self.overflows.record_wrap();
                }
                sample
            }
        }
    }
}

// =============================================================================
// Simulated Stack
// =============================================================================

/// Byte written by simulated routines; differs from every sentinel byte.
const TOUCH: u8 = 0xA5;

/// Bytes above the initial stack pointer treated as live caller frames.
const LIVE_FRAMES: usize = 64;

/// Simulated RAM holding the stack, addressed like target memory.
pub struct SimStack {
    base: usize,
    words: RefCell<Vec<u32>>,
    sp: Cell<usize>,
}

impl SimStack {
    /// `words` words of RAM starting at `base`; the low-water boundary is
    /// `base` and the stack pointer starts just below the live frames.
    pub fn new(
        base: usize,
        words: usize,
    ) -> Self {
        Self {
            base,
            words: RefCell::new(vec![0; words]),
            sp: Cell::new(base + words * WORD_SIZE - LIVE_FRAMES),
        }
    }

    fn index(
        &self,
        addr: usize,
    ) -> usize {
        assert!(addr >= self.base, "address {addr:#x} below simulated RAM");
        (addr - self.base) / WORD_SIZE
    }

    /// Read the word at `addr`.
    pub fn peek(
        &self,
        addr: usize,
    ) -> u32 {
        self.words.borrow()[self.index(addr)]
    }

    /// Write the word at `addr`.
    pub fn poke(
        &self,
        addr: usize,
        value: u32,
    ) {
        let idx = self.index(addr);
        self.words.borrow_mut()[idx] = value;
    }

    fn write_byte(
        &self,
        addr: usize,
        byte: u8,
    ) {
        let idx = self.index(addr);
        let shift = (addr % WORD_SIZE) * 8;
        let mut words = self.words.borrow_mut();
        words[idx] = (words[idx] & !(0xFFu32 << shift)) | (u32::from(byte) << shift);
    }

    /// Move the stack pointer.
    pub fn set_stack_pointer(
        &self,
        addr: usize,
    ) {
        self.sp.set(addr);
    }

    /// Simulate a call: `overhead` bytes of saved registers at the top of the
    /// frame and `touched` bytes of locals below them, then return.
    pub fn call(
        &self,
        overhead: usize,
        touched: usize,
    ) {
        let sp = self.sp.get();
        let bottom = sp - overhead - touched;
        for addr in bottom..sp {
            self.write_byte(addr, TOUCH);
        }
    }

    /// Like [`call`](Self::call), but the routine zeroes its frame before
    /// returning.
    pub fn call_and_zero(
        &self,
        overhead: usize,
        touched: usize,
    ) {
        self.call(overhead, touched);
        let sp = self.sp.get();
        for addr in sp - overhead - touched..sp {
            self.write_byte(addr, 0);
        }
    }
}

impl StackPlatform for SimStack {
    fn low_water(&self) -> usize { self.base }

    fn stack_pointer(&self) -> usize { self.sp.get() }

    unsafe fn fill(
        &self,
        low: usize,
        high: usize,
        pattern: u32,
    ) {
        let (lo, hi) = (self.index(low), self.index(high));
        self.words.borrow_mut()[lo..hi].fill(pattern);
    }

    unsafe fn first_mismatch(
        &self,
        low: usize,
        high: usize,
        pattern: u32,
    ) -> usize {
        let (lo, hi) = (self.index(low), self.index(high));
        self.words.borrow()[lo..hi]
            .iter()
            .position(|&word| word != pattern)
            .map_or(high, |offset| low + offset * WORD_SIZE)
    }
}
