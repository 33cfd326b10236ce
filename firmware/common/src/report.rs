//! Human-readable benchmark report.
//!
//! Lines go to any [`core::fmt::Write`] sink, one `\n`-terminated line per
//! call. On hardware the sink is a blocking UART writer; in tests a `String`.
//!
//! # Line Formats
//!
//! ```text
//! === Benchmarks ===
//! cycles for fnv1a_1k: 123456
//! stack usage for fnv1a_1k: 48 bytes
//! stack headroom: 501234 bytes
//! digest test vector PASSED
//! ERROR: digest mismatch at byte 1 (expected 0x9c, got 0x00)
//! *** ALL GOOD ***
//! ```

use core::fmt::{self, Write};

use crate::harness::{CycleCount, ResultLog, TrialReport};
use crate::vectors::Mismatch;

/// Writes report lines to a sink.
pub struct Reporter<W> {
    sink: W,
}

impl<W: Write> Reporter<W> {
    /// Wrap a sink.
    pub const fn new(sink: W) -> Self { Self { sink } }

    /// Give the sink back.
    pub fn into_inner(self) -> W { self.sink }

    /// One formatted line.
    pub fn line(
        &mut self,
        args: fmt::Arguments<'_>,
    ) -> fmt::Result {
        self.sink.write_fmt(args)?;
        self.sink.write_char('\n')
    }

    /// Section header, preceded by a blank line.
    pub fn section(
        &mut self,
        title: &str,
    ) -> fmt::Result {
        self.line(format_args!("\n=== {title} ==="))
    }

    /// `cycles for <name>: <n>`
    pub fn cycles(
        &mut self,
        name: &str,
        count: CycleCount,
    ) -> fmt::Result {
        self.line(format_args!("cycles for {name}: {count}"))
    }

    /// `stack usage for <name>: <n> bytes`
    pub fn stack(
        &mut self,
        name: &str,
        bytes: usize,
    ) -> fmt::Result {
        self.line(format_args!("stack usage for {name}: {bytes} bytes"))
    }

    /// Every number a trial produced.
    pub fn trial(
        &mut self,
        report: &TrialReport,
    ) -> fmt::Result {
        if let Some(count) = report.cycles {
            self.cycles(report.name, count)?;
        }
        if let Some(bytes) = report.stack_bytes {
            self.stack(report.name, bytes)?;
        }
        Ok(())
    }

    /// Free stack below the caller.
    pub fn headroom(
        &mut self,
        bytes: usize,
    ) -> fmt::Result {
        self.line(format_args!("stack headroom: {bytes} bytes"))
    }

    /// Outcome of a known-answer check.
    pub fn known_answer(
        &mut self,
        label: &str,
        result: &Result<(), Mismatch>,
    ) -> fmt::Result {
        match result {
            Ok(()) => self.line(format_args!("{label} test vector PASSED")),
            Err(mismatch) => self.line(format_args!("ERROR: {label} {mismatch}")),
        }
    }

    /// Summary of the result log, one line per held report.
    pub fn summary(
        &mut self,
        log: &ResultLog,
    ) -> fmt::Result {
        self.section("Summary")?;
        for report in log.iter() {
            self.trial(report)?;
        }
        if log.dropped() > 0 {
            self.line(format_args!("({} older results not kept)", log.dropped()))?;
        }
        Ok(())
    }

    /// Final verdict line.
    pub fn verdict(
        &mut self,
        passed: bool,
    ) -> fmt::Result {
        if passed {
            self.line(format_args!("\n*** ALL GOOD ***"))
        } else {
            self.line(format_args!("\n*** TEST FAILED ***"))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
