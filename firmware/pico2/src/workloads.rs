//! Routines the firmware benchmarks and self-checks run.
//!
//! Each is `#[inline(never)]` so its frame lands below the harness frame,
//! inside the painted region.
//!
//! - [`fnv1a`] / [`digest`]: FNV-1a 32 over a message, checked against known
//!   vectors before it is timed
//! - [`fill_message`]: deterministic xorshift32 message generator
//! - [`touch_stack_array`]: writes a local array of a known size
//! - [`spin`]: busy loop of a given length
//! - [`recurse`]: call chain of a given depth

use core::hint::black_box;

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET: u32 = 0x811C_9DC5;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 0x0100_0193;

/// Length of the benchmarked message.
pub const MESSAGE_LEN: usize = 1024;

/// Seed of the benchmarked message.
pub const MESSAGE_SEED: u32 = 0x1234_5678;

/// Size of the array written by [`touch_stack_array`].
pub const STACK_ARRAY_BYTES: usize = 256;

// =============================================================================
// Known Answers
// =============================================================================

/// `digest(b"")`
pub const DIGEST_EMPTY: [u8; 4] = [0x81, 0x1c, 0x9d, 0xc5];

/// `digest(b"a")`
pub const DIGEST_A: [u8; 4] = [0xe4, 0x0c, 0x29, 0x2c];

/// `digest(b"foobar")`
pub const DIGEST_FOOBAR: [u8; 4] = [0xbf, 0x9c, 0xf9, 0x68];

/// `digest` of the [`MESSAGE_LEN`]-byte message from [`MESSAGE_SEED`].
pub const DIGEST_MESSAGE: [u8; 4] = [0x84, 0x31, 0x09, 0x45];

// =============================================================================
// Digest
// =============================================================================

/// FNV-1a 32 hash.
#[inline(never)]
pub fn fnv1a(data: &[u8]) -> u32 {
    data.iter()
        .fold(FNV_OFFSET, |hash, &byte| (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME))
}

/// FNV-1a 32 hash as big-endian bytes.
#[inline(never)]
pub fn digest(data: &[u8]) -> [u8; 4] { fnv1a(data).to_be_bytes() }

/// Fill `buf` with the low byte of successive xorshift32 states.
pub fn fill_message(
    buf: &mut [u8],
    seed: u32,
) {
    let mut x = seed;
    for byte in buf.iter_mut() {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        *byte = x as u8;
    }
}

// =============================================================================
// Stack and Timing Workloads
// =============================================================================

/// Write every byte of a [`STACK_ARRAY_BYTES`] local array and sum it.
#[inline(never)]
pub fn touch_stack_array(seed: u8) -> u32 {
    let mut buf = [0u8; STACK_ARRAY_BYTES];
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = seed.wrapping_add(i as u8);
    }
    let buf = black_box(&mut buf);
    buf.iter().map(|&b| u32::from(b)).sum()
}

/// Busy loop of `iterations` rounds.
#[inline(never)]
pub fn spin(iterations: u32) -> u32 {
    let mut acc = 0u32;
    for i in 0..iterations {
        acc = black_box(acc.wrapping_add(i));
    }
    acc
}

/// Chain of `depth` non-inlined calls, each keeping a word live.
#[inline(never)]
pub fn recurse(depth: u32) -> u32 {
    if depth == 0 {
        return 0;
    }
    let here = black_box(depth);
    recurse(depth - 1).wrapping_add(here)
}

// =============================================================================
// Tests
// =============================================================================
