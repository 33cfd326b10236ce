//! Benchmark firmware library - testable modules for the Pico 2 target.
//!
//! This library contains the board logic that can be tested on the host
//! machine. Register access is gated on `target_arch = "arm"`; the binary
//! (`main.rs`) adds the entry point, exception handler and report output.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p bench-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p bench-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod cpu_cycles;
pub mod memory;
pub mod selfcheck;
pub mod sink;
pub mod systick;
pub mod workloads;
