//! Stack bounds and stack painting for RP2350.
//!
//! # Memory Layout (RP2350)
//!
//! - RAM: 512KB at 0x20000000 (striped across SRAM0-7)
//! - SRAM4: 4KB at 0x20080000 (direct mapped)
//! - SRAM5: 4KB at 0x20081000 (direct mapped)
//!
//! # Stack
//!
//! cortex-m-rt places `.data`, `.bss` and `.uninit` at the bottom of RAM and
//! starts the main stack at `_stack_start` (top of RAM), growing down toward
//! `__sheap`. There is no heap in this firmware, so everything between
//! `__sheap` and the stack pointer is free stack that can be painted.

#[cfg(target_arch = "arm")]
use bench_common::StackPlatform;

/// RP2350 RAM configuration.
pub const RAM_START: u32 = 0x2000_0000;
pub const RAM_SIZE: u32 = 512 * 1024; // 512KB

/// Memory statistics snapshot.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct MemoryStats {
    /// Current stack pointer value (MSP register).
    pub stack_ptr: u32,
    /// Initial stack pointer (`_stack_start`).
    pub stack_top: u32,
    /// End of static data (`__sheap`), the lowest address the stack may reach.
    pub low_water: u32,
}

impl MemoryStats {
    /// Build a snapshot from raw bounds.
    pub const fn from_bounds(
        stack_ptr: u32,
        low_water: u32,
        stack_top: u32,
    ) -> Self {
        Self {
            stack_ptr,
            stack_top,
            low_water,
        }
    }

    /// Collect current memory statistics from MSP and the linker symbols.
    #[cfg(target_arch = "arm")]
    pub fn collect() -> Self {
        let stack_ptr = cortex_m::register::msp::read();
        Self::from_bounds(stack_ptr, symbols::low_water() as u32, symbols::stack_top() as u32)
    }

    /// Stack in use above the current pointer.
    pub const fn stack_used(&self) -> u32 { self.stack_top.saturating_sub(self.stack_ptr) }

    /// Whole stack region.
    pub const fn stack_total(&self) -> u32 { self.stack_top.saturating_sub(self.low_water) }

    /// Free stack below the current pointer.
    pub const fn headroom(&self) -> u32 { self.stack_ptr.saturating_sub(self.low_water) }

    /// RAM taken by static data.
    pub const fn static_ram(&self) -> u32 { self.low_water.saturating_sub(RAM_START) }

    /// Get stack usage as a percentage.
    pub fn stack_percent(&self) -> u32 {
        let total = self.stack_total();
        if total > 0 {
            (u64::from(self.stack_used()) * 100 / u64::from(total)) as u32
        } else {
            0
        }
    }

    /// Get static RAM usage as a percentage of total.
    pub fn static_percent(&self) -> u32 { (u64::from(self.static_ram()) * 100 / u64::from(RAM_SIZE)) as u32 }
}

// =============================================================================
// Linker Symbols
// =============================================================================

#[cfg(target_arch = "arm")]
mod symbols {
    unsafe extern "C" {
        static __sheap: u32;
        static _stack_start: u32;
    }

    /// First address after static data.
    #[inline(always)]
    #[allow(unused_unsafe)]
    pub fn low_water() -> usize {
        // SAFETY: only the address is taken, the symbol is never read.
        unsafe { &raw const __sheap as usize }
    }

    /// Initial main stack pointer.
    #[inline(always)]
    #[allow(unused_unsafe)]
    pub fn stack_top() -> usize {
        // SAFETY: only the address is taken, the symbol is never read.
        unsafe { &raw const _stack_start as usize }
    }
}

// =============================================================================
// Cortex-M Stack Painting
// =============================================================================

/// [`StackPlatform`] for the Cortex-M33 main stack.
///
/// Fill and scan are register-only assembly loops, so painting never pushes
/// a frame into the region being painted.
#[derive(Clone, Copy, Debug)]
pub struct CortexMStack {
    low_water: usize,
}

impl CortexMStack {
    /// Stack region as laid out by the linker script.
    #[cfg(target_arch = "arm")]
    pub fn from_linker() -> Self {
        Self {
            low_water: symbols::low_water(),
        }
    }
}

#[cfg(target_arch = "arm")]
impl StackPlatform for CortexMStack {
    #[inline(always)]
    fn low_water(&self) -> usize { self.low_water }

    #[inline(always)]
    fn stack_pointer(&self) -> usize {
        let sp: usize;
        // SAFETY: reads SP into a register.
        unsafe { core::arch::asm!("mov {}, sp", out(reg) sp, options(nomem, nostack, preserves_flags)) };
        sp
    }

    #[inline(always)]
    unsafe fn fill(
        &self,
        low: usize,
        high: usize,
        pattern: u32,
    ) {
        // SAFETY: the caller guarantees [low, high) is free, aligned stack.
        unsafe {
            core::arch::asm!(
                "2:",
                "cmp {p}, {end}",
                "bhs 3f",
                "str {pat}, [{p}], #4",
                "b 2b",
                "3:",
                p = inout(reg) low => _,
                end = in(reg) high,
                pat = in(reg) pattern,
                options(nostack),
            );
        }
    }

    #[inline(always)]
    unsafe fn first_mismatch(
        &self,
        low: usize,
        high: usize,
        pattern: u32,
    ) -> usize {
        let mut p = low;
        // SAFETY: the caller guarantees [low, high) is aligned, readable RAM.
        unsafe {
            core::arch::asm!(
                "2:",
                "cmp {p}, {end}",
                "bhs 3f",
                "ldr {w}, [{p}]",
                "cmp {w}, {pat}",
                "bne 3f",
                "add {p}, {p}, #4",
                "b 2b",
                "3:",
                p = inout(reg) p,
                end = in(reg) high,
                pat = in(reg) pattern,
                w = out(reg) _,
                options(nostack, readonly),
            );
        }
        p
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RAM_END: u32 = RAM_START + RAM_SIZE;

    #[test]
    fn test_constants() {
        assert_eq!(RAM_SIZE, 524_288); // 512KB
        assert_eq!(RAM_END, 0x2008_0000);
    }

    #[test]
    fn test_memory_stats_default() {
        let stats = MemoryStats::default();
        assert_eq!(stats.stack_ptr, 0);
        assert_eq!(stats.headroom(), 0);
        assert_eq!(stats.stack_used(), 0);
    }

    #[test]
    fn test_stack_region() {
        let stats = MemoryStats::from_bounds(0x2007_F000, 0x2000_4000, RAM_END);
        assert_eq!(stats.stack_used(), 0x1000);
        assert_eq!(stats.headroom(), 0x7_B000);
        assert_eq!(stats.stack_total(), stats.stack_used() + stats.headroom());
        assert_eq!(stats.static_ram(), 0x4000);
    }

    #[test]
    fn test_stack_percent() {
        let stats = MemoryStats::from_bounds(RAM_END - 1000, RAM_END - 10_000, RAM_END);
        assert_eq!(stats.stack_percent(), 10);
    }

    #[test]
    fn test_static_percent() {
        let stats = MemoryStats::from_bounds(RAM_END, RAM_START + 307_200, RAM_END);
        // 307200 / 524288 * 100 = ~58%
        assert_eq!(stats.static_percent(), 58);
    }

    #[test]
    fn test_pointer_below_low_water_saturates() {
        let stats = MemoryStats::from_bounds(RAM_START, RAM_START + 64, RAM_END);
        assert_eq!(stats.headroom(), 0);
    }

    #[test]
    fn test_empty_stack_region_percent() {
        let stats = MemoryStats::from_bounds(RAM_END, RAM_END, RAM_END);
        assert_eq!(stats.stack_percent(), 0);
    }
}
