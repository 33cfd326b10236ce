//! Benchmark sequencing around a [`MonotonicClock`] and a [`StackProbe`].
//!
//! Each trial follows the same protocol:
//!
//! 1. paint the stack (stack trials)
//! 2. read the clock (timed trials)
//! 3. call the routine
//! 4. read the clock again and take the delta
//! 5. scan the stack
//!
//! A trial that wants both numbers runs the routine twice, first timed and
//! then stack-measured, so neither window includes the other's work. Routines
//! must be deterministic for the two runs to describe the same computation.
//!
//! Measured routines should be real calls (`#[inline(never)]`): whatever is
//! inlined into the harness frame sits above the painted region and is not
//! counted.

use core::fmt;
use core::hint::black_box;

use heapless::Deque;

use crate::clock::{CountdownTimer, MonotonicClock, elapsed};
use crate::config::{NOT_MEANINGFUL, RESULT_LOG_CAPACITY};
use crate::stack::{StackPlatform, StackProbe};
use crate::vectors::{KnownAnswer, Mismatch};

// =============================================================================
// Trial Results
// =============================================================================

/// Which instrumentation a trial runs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Measure {
    /// Elapsed cycles only.
    Cycles,
    /// Stack high-water mark only.
    Stack,
    /// Both, from two separate invocations.
    Both,
}

impl Measure {
    #[inline]
    const fn timed(self) -> bool { matches!(self, Self::Cycles | Self::Both) }

    #[inline]
    const fn stacked(self) -> bool { matches!(self, Self::Stack | Self::Both) }
}

/// Elapsed cycles of a timed call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CycleCount {
    /// Cycles read from the hardware clock.
    Measured(u64),
    /// No cycle-accurate clock (emulator); the number would be noise.
    NotMeaningful,
}

impl fmt::Display for CycleCount {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Measured(cycles) => write!(f, "{cycles}"),
            Self::NotMeaningful => f.write_str(NOT_MEANINGFUL),
        }
    }
}

/// Structured result of one trial.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TrialReport {
    /// Trial name as printed in the report.
    pub name: &'static str,
    /// Elapsed cycles, for timed trials.
    pub cycles: Option<CycleCount>,
    /// Stack bytes used, for stack trials.
    pub stack_bytes: Option<usize>,
}

// =============================================================================
// Result Log
// =============================================================================

/// Ring of the most recent trial reports.
///
/// Stores the last `RESULT_LOG_CAPACITY` reports. Old reports are dropped when
/// the log is full and counted in [`dropped`](Self::dropped).
pub struct ResultLog {
    records: Deque<TrialReport, RESULT_LOG_CAPACITY>,
    dropped: usize,
}

impl ResultLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            records: Deque::new(),
            dropped: 0,
        }
    }

    /// Append a report, dropping the oldest if the log is full.
    pub fn push(
        &mut self,
        report: TrialReport,
    ) {
        if self.records.is_full() {
            self.records.pop_front();
            self.dropped += 1;
        }
        self.records.push_back(report).ok();
    }

    /// Iterate over reports (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &TrialReport> { self.records.iter() }

    /// Number of reports held.
    #[inline]
    pub fn len(&self) -> usize { self.records.len() }

    /// Check if no report is held.
    #[inline]
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Reports pushed out by newer ones.
    #[inline]
    pub const fn dropped(&self) -> usize { self.dropped }
}

impl Default for ResultLog {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Bench
// =============================================================================

/// Runs trials and keeps their results plus the pass/fail state of a run.
pub struct Bench<'a, T, P> {
    clock: MonotonicClock<'a, T>,
    probe: StackProbe<P>,
    emulated: bool,
    failures: u32,
    log: ResultLog,
}

impl<'a, T: CountdownTimer, P: StackPlatform> Bench<'a, T, P> {
    /// Create a bench from a running clock and a stack probe.
    pub fn new(
        clock: MonotonicClock<'a, T>,
        probe: StackProbe<P>,
    ) -> Self {
        Self {
            clock,
            probe,
            emulated: false,
            failures: 0,
            log: ResultLog::new(),
        }
    }

    /// Mark cycle counts as not meaningful (emulator without a real clock).
    pub fn with_emulation(
        mut self,
        emulated: bool,
    ) -> Self {
        self.emulated = emulated;
        self
    }

    /// Time one call.
    #[inline(never)]
    pub fn time<R>(
        &self,
        routine: impl FnOnce() -> R,
    ) -> (R, CycleCount) {
        let start = self.clock.get_time();
        let out = black_box(routine());
        let end = self.clock.get_time();

        let count = if self.emulated {
            CycleCount::NotMeaningful
        } else {
            CycleCount::Measured(elapsed(start, end))
        };
        (out, count)
    }

    /// Measure the stack used by one call.
    #[inline(never)]
    pub fn stack<R>(
        &mut self,
        routine: impl FnOnce() -> R,
    ) -> (R, usize) {
        self.probe.spraystack();
        let out = black_box(routine());
        let used = self.probe.checkstack();
        (out, used)
    }

    /// Run a named trial and log its report.
    pub fn trial<R>(
        &mut self,
        name: &'static str,
        measure: Measure,
        mut routine: impl FnMut() -> R,
    ) -> TrialReport {
        let cycles = if measure.timed() {
            Some(self.time(&mut routine).1)
        } else {
            None
        };
        let stack_bytes = if measure.stacked() {
            Some(self.stack(&mut routine).1)
        } else {
            None
        };

        let report = TrialReport {
            name,
            cycles,
            stack_bytes,
        };
        self.log.push(report);
        report
    }

    /// Check a routine's output against its vector; a mismatch fails the run.
    pub fn verify(
        &mut self,
        kat: &KnownAnswer<'_>,
        actual: &[u8],
    ) -> Result<(), Mismatch> {
        let result = kat.check(actual);
        if result.is_err() {
            self.record_failure();
        }
        result
    }

    /// Count a failed check against the run.
    pub fn record_failure(&mut self) { self.failures += 1; }

    /// Number of failed checks so far.
    #[inline]
    pub const fn failures(&self) -> u32 { self.failures }

    /// Whether every check so far passed.
    #[inline]
    pub const fn all_passed(&self) -> bool { self.failures == 0 }

    /// Stack bytes available below the caller right now.
    #[inline]
    pub fn headroom(&self) -> usize { self.probe.get_untouched_headroom() }

    /// Whether cycle counts are suppressed.
    #[inline]
    pub const fn is_emulated(&self) -> bool { self.emulated }

    /// The cycle clock.
    #[inline]
    pub fn clock(&self) -> &MonotonicClock<'a, T> { &self.clock }

    /// Reports of the trials run so far.
    #[inline]
    pub fn log(&self) -> &ResultLog { &self.log }
}

// =============================================================================
// Tests
// =============================================================================
