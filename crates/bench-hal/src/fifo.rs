// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define the blocking inter-core mailbox contract and the SIO FIFO backend.
// Author: Lukas Bower
//! Inter-core mailbox channel.
//!
//! A mailbox is one endpoint of a full-duplex link built from two independent
//! word FIFOs. `send` pushes onto the outbound FIFO and blocks while it is
//! full; `receive` pops from the inbound FIFO and blocks while it is empty.
//! Words are delivered in push order on each direction. Nothing times out and
//! nothing reports an error: a peer that never drains or never sends leaves
//! the caller blocked indefinitely. Framing is the caller's business.

use log::trace;

use crate::barrier::{fifo_wmb, signal_event, wait_for_event};
use crate::mmio::MmioBlock;

/// Number of words each direction can hold before `send` blocks.
pub const FIFO_DEPTH: usize = 8;

/// Blocking word channel between two execution contexts.
pub trait Mailbox {
    /// Push `word` onto the outbound FIFO, waiting for space.
    fn send(&mut self, word: u32);

    /// Pop the oldest word from the inbound FIFO, waiting for one to arrive.
    fn receive(&mut self) -> u32;
}

impl<M: Mailbox + ?Sized> Mailbox for &mut M {
    fn send(&mut self, word: u32) {
        (**self).send(word);
    }

    fn receive(&mut self) -> u32 {
        (**self).receive()
    }
}

/// Base address of the single-cycle IO block. Each core sees its own FIFO
/// pair at the same offsets.
pub const SIO_BASE: usize = 0xd000_0000;

const FIFO_ST: usize = 0x50;
const FIFO_WR: usize = 0x54;
const FIFO_RD: usize = 0x58;

const ST_VLD: u32 = 1 << 0;
const ST_RDY: u32 = 1 << 1;
const ST_WOF: u32 = 1 << 2;
const ST_ROE: u32 = 1 << 3;

/// SIO inter-core FIFO accessed through its status/write/read registers.
#[derive(Debug)]
pub struct SioFifo {
    block: MmioBlock,
}

impl SioFifo {
    /// Bind to the FIFO pair of the calling core.
    ///
    /// # Safety
    ///
    /// The SIO block must be mapped at [`SIO_BASE`] and no other accessor may
    /// pop from the same core's inbound FIFO.
    #[allow(unsafe_code)]
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self {
            block: unsafe { MmioBlock::new(SIO_BASE) },
        }
    }

    /// Bind to a FIFO register block at a non-default base.
    ///
    /// # Safety
    ///
    /// Same contract as [`SioFifo::new`] for the block at `base`.
    #[allow(unsafe_code)]
    #[must_use]
    pub const unsafe fn with_base(base: usize) -> Self {
        Self {
            block: unsafe { MmioBlock::new(base) },
        }
    }

    fn status(&self) -> u32 {
        self.block.read32(FIFO_ST)
    }

    /// Returns `true` when the inbound FIFO holds at least one word.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.status() & ST_VLD != 0
    }

    /// Returns `true` when the outbound FIFO has room for another word.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.status() & ST_RDY != 0
    }

    /// Discard every word currently queued on the inbound FIFO.
    pub fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while self.is_readable() {
            let _ = self.block.read32(FIFO_RD);
            dropped += 1;
        }
        dropped
    }

    /// Clear the sticky write-overflow and read-underflow flags.
    pub fn clear_errors(&mut self) {
        let status = self.status();
        if status & (ST_WOF | ST_ROE) != 0 {
            trace!(target: "hal-fifo", "[fifo] clearing sticky status 0x{status:08x}");
        }
        self.block.write32(FIFO_ST, ST_WOF | ST_ROE);
    }
}

impl Mailbox for SioFifo {
    fn send(&mut self, word: u32) {
        while !self.is_writable() {
            core::hint::spin_loop();
        }
        fifo_wmb();
        self.block.write32(FIFO_WR, word);
        signal_event();
    }

    fn receive(&mut self) -> u32 {
        while !self.is_readable() {
            wait_for_event();
        }
        self.block.read32(FIFO_RD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unsafe_code)]
    fn fifo_over(words: &mut [u32; 32]) -> SioFifo {
        unsafe { SioFifo::with_base(words.as_mut_ptr() as usize) }
    }

    #[test]
    fn sio_receive_reads_when_valid() {
        let mut regs = [0u32; 32];
        regs[FIFO_ST / 4] = ST_VLD | ST_RDY;
        regs[FIFO_RD / 4] = 0x1234;
        let mut fifo = fifo_over(&mut regs);
        assert!(fifo.is_readable());
        assert_eq!(fifo.receive(), 0x1234);
    }

    #[test]
    fn sio_send_writes_data_register() {
        let mut regs = [0u32; 32];
        regs[FIFO_ST / 4] = ST_RDY;
        let mut fifo = fifo_over(&mut regs);
        fifo.send(0xfeed);
        assert_eq!(regs[FIFO_WR / 4], 0xfeed);
    }

    #[test]
    fn clear_errors_writes_sticky_bits() {
        let mut regs = [0u32; 32];
        let mut fifo = fifo_over(&mut regs);
        fifo.clear_errors();
        assert_eq!(regs[FIFO_ST / 4], ST_WOF | ST_ROE);
        assert!(!fifo.is_readable());
    }
}
