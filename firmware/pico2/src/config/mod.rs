//! Board configuration.
//!
//! - `board`: clock profile, emulation flag and report UART
//! - `checks`: self-check thresholds

pub mod board;
pub mod checks;

pub use board::{CLOCK_MODE, CORE_FREQ_HZ, EMULATED, UART_BAUD};
pub use checks::{CLOCK_CHECK_ITERATIONS, CLOCK_CHECK_MIN_WRAPS, CLOCK_TOLERANCE_CYCLES, STACK_SLACK_BYTES};
