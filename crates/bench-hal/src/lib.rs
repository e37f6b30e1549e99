// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Defines the bench-hal library and public module surface.
// Author: Lukas Bower
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! Hardware access layer for the dual-core benchmark.
//!
//! The layer exposes the three peripherals the benchmark depends on: the
//! inter-core FIFO pair, the XIP cache control register and the free-running
//! microsecond timer. Each has an MMIO backend targeting the RP2040 memory
//! map and, with the `std` feature, a host backend so the protocol can run
//! on two threads of a development machine.

pub mod barrier;
pub mod cache;
pub mod fifo;
#[cfg(feature = "std")]
pub mod host;
pub mod launch;
pub mod mmio;
pub mod timer;

pub use cache::{CacheController, CacheView};
pub use fifo::{Mailbox, FIFO_DEPTH};
pub use mmio::{MmioRegister, Register32, SimRegister};
pub use timer::{elapsed_us, measure, Clock};
