//! Line-buffered report output.
//!
//! The [`Reporter`](bench_common::Reporter) writes through `core::fmt`; the
//! board wants whole lines so each one can go to the UART and to defmt at
//! once. [`LineSink`] collects characters and hands every completed line to a
//! callback, without the trailing newline.
//!
//! Lines longer than [`REPORT_LINE_LEN`] are split at the buffer size.

use core::fmt;

use bench_common::config::REPORT_LINE_LEN;
use heapless::String;

/// Collects text into lines and passes each to `emit`.
pub struct LineSink<F> {
    line: String<REPORT_LINE_LEN>,
    emit: F,
}

impl<F: FnMut(&str)> LineSink<F> {
    pub const fn new(emit: F) -> Self {
        Self {
            line: String::new(),
            emit,
        }
    }

    /// Emit the buffered text as a line, even if empty.
    pub fn flush(&mut self) {
        (self.emit)(self.line.as_str());
        self.line.clear();
    }
}

impl<F: FnMut(&str)> fmt::Write for LineSink<F> {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if c == '\n' {
                self.flush();
                continue;
            }
            if self.line.push(c).is_err() {
                self.flush();
                self.line.push(c).map_err(|_| fmt::Error)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
