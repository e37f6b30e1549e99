// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Provide single-writer access to the XIP cache enable bit.
// Author: Lukas Bower
//! XIP cache enable control.
//!
//! The enable flag lives in bit 0 of a control register shared by both
//! cores, so a toggle changes fetch behaviour for the whole chip. Updates are
//! a plain read-modify-write with no lock: correctness relies on there being
//! exactly one writer. [`CacheController`] is that writer and takes `&mut
//! self` for every mutation; other contexts get a [`CacheView`], which can
//! only read.

use log::debug;

use crate::mmio::{MmioRegister, Register32};

/// Base address of the XIP control block; `CTRL` sits at offset 0.
pub const XIP_CTRL_BASE: usize = 0x1400_0000;
/// Cache enable flag inside `CTRL`.
pub const CTRL_EN: u32 = 1 << 0;
/// Power-on value of `CTRL`: cache enabled, bad-write errors enabled.
pub const CTRL_RESET: u32 = 0x0000_0003;

/// Exclusive writer of the cache enable bit.
#[derive(Debug)]
pub struct CacheController<R: Register32> {
    reg: R,
}

impl CacheController<MmioRegister> {
    /// Bind a controller to the on-chip XIP `CTRL` register.
    ///
    /// # Safety
    ///
    /// At most one controller may exist for the register; see [`MmioRegister::new`].
    #[allow(unsafe_code)]
    #[must_use]
    pub unsafe fn xip() -> Self {
        Self::new(unsafe { MmioRegister::new(XIP_CTRL_BASE) })
    }
}

impl<R: Register32> CacheController<R> {
    /// Wrap `reg` as the cache control register.
    #[must_use]
    pub const fn new(reg: R) -> Self {
        Self { reg }
    }

    /// Returns the current state of the enable bit.
    #[must_use]
    pub fn get_enabled(&self) -> bool {
        self.reg.read() & CTRL_EN != 0
    }

    /// Set or clear the enable bit, preserving every other bit, and return
    /// the state observed before the write.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let current = self.reg.read();
        let previous = current & CTRL_EN != 0;
        let next = if enabled {
            current | CTRL_EN
        } else {
            current & !CTRL_EN
        };
        self.reg.write(next);
        debug!(
            target: "hal-cache",
            "[cache] CTRL 0x{current:08x} -> 0x{next:08x} enabled={previous}->{enabled}"
        );
        previous
    }

    /// Hand out a read-only view of the same register.
    #[must_use]
    pub fn view(&self) -> CacheView<R>
    where
        R: Clone,
    {
        CacheView {
            reg: self.reg.clone(),
        }
    }

    /// Release the underlying register.
    pub fn into_inner(self) -> R {
        self.reg
    }
}

/// Read-only handle on the cache enable bit.
#[derive(Clone, Debug)]
pub struct CacheView<R: Register32> {
    reg: R,
}

impl<R: Register32> CacheView<R> {
    /// Returns the current state of the enable bit.
    #[must_use]
    pub fn get_enabled(&self) -> bool {
        self.reg.read() & CTRL_EN != 0
    }
}
