//! Cycle and stack benchmark firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Runs once after reset and prints a report on UART0 (TX on GPIO0,
//! 115200 8N1), mirrored to defmt over RTT:
//!
//! 1. stack headroom at entry
//! 2. known-answer tests of the benchmarked routines
//! 3. cycle and stack benchmarks
//! 4. self-checks of the clock (against DWT) and of the stack probe
//! 5. summary and a final `*** ALL GOOD ***` / `*** TEST FAILED ***`
//!
//! # Clock
//!
//! Cycles are counted by SysTick (24-bit, core clock) extended by a wrap
//! counter incremented in the SysTick exception. The board runs at 24 MHz
//! unless built with `clock-fast` (150 MHz).

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use core::fmt;
use core::hint::black_box;

use bench_common::clock::elapsed;
use bench_common::config::SYSTICK_PERIOD;
use bench_common::{Bench, KnownAnswer, Measure, Reporter, StackProbe};
use bench_pico2::config::{CLOCK_CHECK_ITERATIONS, CLOCK_MODE, CORE_FREQ_HZ, EMULATED, UART_BAUD};
use bench_pico2::cpu_cycles;
use bench_pico2::memory::{CortexMStack, MemoryStats};
use bench_pico2::selfcheck::{ClockCheck, StackCheck, verdict};
use bench_pico2::sink::LineSink;
use bench_pico2::systick::{self, SysTickTimer};
use bench_pico2::workloads::{self, MESSAGE_LEN, MESSAGE_SEED, STACK_ARRAY_BYTES};
use cortex_m_rt::{entry, exception};
use defmt::{error, info, warn};
use embassy_rp::uart::{self, UartTx};
use {defmt_rtt as _, panic_probe as _};

type BoardBench = Bench<'static, SysTickTimer, CortexMStack>;

/// Digest vectors checked before anything is timed.
const DIGEST_VECTORS: [(&str, &[u8], [u8; 4]); 3] = [
    ("fnv1a_empty", b"", workloads::DIGEST_EMPTY),
    ("fnv1a_a", b"a", workloads::DIGEST_A),
    ("fnv1a_foobar", b"foobar", workloads::DIGEST_FOOBAR),
];

/// Depth of the recursion benchmark.
const RECURSE_DEPTH: u32 = 16;

/// Iterations of the short busy-loop benchmark.
const SPIN_ITERATIONS: u32 = 10_000;

// =============================================================================
// Boot Metadata
// =============================================================================

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"pico2-bench"),
    embassy_rp::binary_info::rp_program_description!(c"Cycle and stack benchmarks on SysTick"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

// Emulated builds report no cycle counts and run at the default clock
#[cfg(all(feature = "clock-fast", feature = "emulated"))]
compile_error!("Features `clock-fast` and `emulated` cannot be enabled together");

// =============================================================================
// SysTick Wrap Counter
// =============================================================================

#[exception]
fn SysTick() { systick::OVERFLOWS.record_wrap(); }

// =============================================================================
// Entry
// =============================================================================

#[entry]
fn main() -> ! {
    info!("Benchmark firmware starting ({} clock, {} Hz)", CLOCK_MODE.label(), CORE_FREQ_HZ);

    let p = {
        use embassy_rp::clocks::ClockConfig;
        use embassy_rp::config::Config;

        let mut config = Config::default();
        config.clocks = ClockConfig::system_freq(CORE_FREQ_HZ).expect("Invalid system clock frequency");
        embassy_rp::init(config)
    };

    let core = cortex_m::Peripherals::take().expect("Core peripherals already taken");
    cpu_cycles::init();
    systick::init(core.SYST);

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = UART_BAUD;
    let mut tx = UartTx::new_blocking(p.UART0, p.PIN_0, uart_config);

    let sink = LineSink::new(|line: &str| {
        tx.blocking_write(line.as_bytes()).ok();
        tx.blocking_write(b"\r\n").ok();
        if line.starts_with("ERROR") || line.contains("FAILED") {
            error!("{=str}", line);
        } else {
            info!("{=str}", line);
        }
    });
    let mut out = Reporter::new(sink);

    // SAFETY: cortex-m-rt reserves everything from `__sheap` up to the stack
    // pointer for the main stack, and there is no heap.
    let probe = unsafe { StackProbe::new(CortexMStack::from_linker()) };
    let mut bench = Bench::new(systick::clock(), probe).with_emulation(EMULATED);

    match run(&mut bench, &mut out) {
        Ok(()) if bench.all_passed() => info!("Run complete"),
        Ok(()) => error!("Run complete with {} failed checks", bench.failures()),
        Err(_) => error!("Report output failed"),
    }

    loop {
        cortex_m::asm::wfi();
    }
}

// =============================================================================
// Run Sequence
// =============================================================================

fn run<W: fmt::Write>(
    bench: &mut BoardBench,
    out: &mut Reporter<W>,
) -> fmt::Result {
    let stats = MemoryStats::collect();
    out.line(format_args!("clock: {} ({} Hz)", CLOCK_MODE.label(), CORE_FREQ_HZ))?;
    out.line(format_args!(
        "static RAM: {} bytes ({}%), stack region: {} bytes ({}% in use, {} free)",
        stats.static_ram(),
        stats.static_percent(),
        stats.stack_total(),
        stats.stack_percent(),
        stats.headroom()
    ))?;
    out.headroom(bench.headroom())?;

    let mut message = [0u8; MESSAGE_LEN];
    workloads::fill_message(&mut message, MESSAGE_SEED);

    out.section("Known Answer Tests")?;
    for (label, input, expected) in DIGEST_VECTORS {
        let result = bench.verify(&KnownAnswer::new(label, &expected), &workloads::digest(input));
        out.known_answer(label, &result)?;
    }
    let result = bench.verify(
        &KnownAnswer::new("fnv1a_1k", &workloads::DIGEST_MESSAGE),
        &workloads::digest(&message),
    );
    out.known_answer("fnv1a_1k", &result)?;

    out.section("Benchmarks")?;
    let report = bench.trial("fnv1a_1k", Measure::Both, || workloads::digest(&message));
    out.trial(&report)?;
    let report = bench.trial("recurse_16", Measure::Both, || workloads::recurse(RECURSE_DEPTH));
    out.trial(&report)?;
    let report = bench.trial("spin_10k", Measure::Cycles, || workloads::spin(SPIN_ITERATIONS));
    out.trial(&report)?;
    let report = bench.trial("stack_array_256", Measure::Stack, || workloads::touch_stack_array(0x5A));
    out.trial(&report)?;

    out.section("Self Checks")?;
    if bench.is_emulated() {
        out.line(format_args!("clock check: skipped under emulation"))?;
    } else {
        let check = clock_check(bench);
        out.line(format_args!(
            "{check} over {} ms: {}",
            cpu_cycles::cycles_to_ms(check.reference, CORE_FREQ_HZ),
            verdict(check.passed())
        ))?;
        if !check.passed() {
            warn!("SysTick clock off by {} cycles over {} wraps", check.deviation(), check.systick / SYSTICK_PERIOD);
            bench.record_failure();
        }
    }

    let (_, measured) = bench.stack(|| workloads::touch_stack_array(0xA5));
    let check = StackCheck::new(measured, STACK_ARRAY_BYTES);
    out.line(format_args!("{check}: {}", verdict(check.passed())))?;
    if !check.passed() {
        warn!("Stack probe measured {} bytes for {}", check.measured, check.expected);
        bench.record_failure();
    }
    out.headroom(bench.headroom())?;

    out.summary(bench.log())?;
    out.verdict(bench.all_passed())
}

/// Time a busy loop spanning several SysTick wraps with both counters.
fn clock_check(bench: &BoardBench) -> ClockCheck {
    let clock = bench.clock();

    let dwt_start = cpu_cycles::read();
    let start = clock.get_time();
    black_box(workloads::spin(CLOCK_CHECK_ITERATIONS));
    let end = clock.get_time();
    let dwt_end = cpu_cycles::read();

    ClockCheck::new(elapsed(start, end), u64::from(cpu_cycles::elapsed(dwt_start, dwt_end)))
}
