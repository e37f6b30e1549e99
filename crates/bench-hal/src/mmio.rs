// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Provide volatile register accessors and a simulated register for host runs.
// Author: Lukas Bower
//! Memory-mapped register access helpers.
#![allow(unsafe_code)]

use core::ptr;

use portable_atomic::{AtomicU32, Ordering};

/// A single 32-bit control or status register.
pub trait Register32 {
    /// Read the current register value.
    fn read(&self) -> u32;

    /// Write `value` to the register.
    fn write(&self, value: u32);
}

impl<R: Register32 + ?Sized> Register32 for &R {
    fn read(&self) -> u32 {
        (**self).read()
    }

    fn write(&self, value: u32) {
        (**self).write(value);
    }
}

#[cfg(feature = "std")]
impl<R: Register32 + ?Sized> Register32 for std::sync::Arc<R> {
    fn read(&self) -> u32 {
        (**self).read()
    }

    fn write(&self, value: u32) {
        (**self).write(value);
    }
}

/// Volatile accessor for one device register at a fixed address.
#[derive(Clone, Debug)]
pub struct MmioRegister {
    addr: usize,
}

impl MmioRegister {
    /// Bind the accessor to `addr`.
    ///
    /// # Safety
    ///
    /// `addr` must name a 4-byte aligned device register that stays mapped
    /// for the lifetime of the accessor and of every clone of it.
    #[must_use]
    pub const unsafe fn new(addr: usize) -> Self {
        Self { addr }
    }
}

// Device registers are not tied to the context that created the accessor.
unsafe impl Send for MmioRegister {}
unsafe impl Sync for MmioRegister {}

impl Register32 for MmioRegister {
    #[inline(always)]
    fn read(&self) -> u32 {
        unsafe { ptr::read_volatile(self.addr as *const u32) }
    }

    #[inline(always)]
    fn write(&self, value: u32) {
        unsafe { ptr::write_volatile(self.addr as *mut u32, value) }
    }
}

/// Register block addressed by byte offsets from a base.
#[derive(Clone, Debug)]
pub struct MmioBlock {
    base: usize,
}

impl MmioBlock {
    /// Bind the block to `base`.
    ///
    /// # Safety
    ///
    /// Every offset later passed to [`MmioBlock::read32`] or
    /// [`MmioBlock::write32`] must name a mapped, aligned device register.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline(always)]
    pub(crate) fn read32(&self, offset: usize) -> u32 {
        unsafe { ptr::read_volatile((self.base + offset) as *const u32) }
    }

    #[inline(always)]
    pub(crate) fn write32(&self, offset: usize, value: u32) {
        unsafe { ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}

/// Register stand-in backed by an atomic word.
///
/// Reads and writes are individually atomic; a read-modify-write built on
/// top of them is not, matching the hardware register it replaces.
#[derive(Debug, Default)]
pub struct SimRegister {
    value: AtomicU32,
}

impl SimRegister {
    /// Create a register holding `reset` as its power-on value.
    #[must_use]
    pub const fn new(reset: u32) -> Self {
        Self {
            value: AtomicU32::new(reset),
        }
    }
}

impl Register32 for SimRegister {
    fn read(&self) -> u32 {
        self.value.load(Ordering::Acquire)
    }

    fn write(&self, value: u32) {
        self.value.store(value, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_register_holds_reset_value() {
        let reg = SimRegister::new(0x0000_0003);
        assert_eq!(reg.read(), 3);
        reg.write(0xdead_beef);
        assert_eq!(reg.read(), 0xdead_beef);
    }

    #[test]
    fn mmio_register_reads_backing_word() {
        let mut word: u32 = 0x55;
        let reg = unsafe { MmioRegister::new(&mut word as *mut u32 as usize) };
        assert_eq!(reg.read(), 0x55);
        reg.write(0xaa);
        assert_eq!(reg.read(), 0xaa);
    }

    #[test]
    fn mmio_block_offsets_address_words() {
        let mut words = [0u32; 4];
        let block = unsafe { MmioBlock::new(words.as_mut_ptr() as usize) };
        block.write32(8, 7);
        assert_eq!(block.read32(8), 7);
        assert_eq!(block.read32(0), 0);
    }
}
