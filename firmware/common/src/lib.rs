//! Measurement core for bare-metal benchmarks.
//!
//! This crate contains the platform-agnostic half of the benchmark firmware.
//! Board crates supply the hardware behind two small traits and get cycle
//! counts and stack high-water marks back:
//!
//! - [`clock`]: 64-bit monotonic cycle clock over a wrapping countdown timer
//! - [`stack`]: paint-and-scan stack high-water-mark probe
//! - [`harness`]: trial sequencing, structured results, pass/fail tracking
//! - [`report`]: textual report lines for a byte-oriented sink
//! - [`vectors`]: known-answer comparison of routine outputs
//! - [`config`]: timer, sentinel and reporting constants
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p bench-common
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`) against simulated hardware,
//! while the firmware uses the crate as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod clock;
pub mod config;
pub mod harness;
pub mod report;
pub mod stack;
pub mod vectors;

#[cfg(test)]
mod sim;

// Re-export commonly used items
pub use clock::{CountdownTimer, MonotonicClock, OverflowCounter};
pub use harness::{Bench, CycleCount, Measure, TrialReport};
pub use report::Reporter;
pub use stack::{StackPlatform, StackProbe};
pub use vectors::{KnownAnswer, Mismatch};
