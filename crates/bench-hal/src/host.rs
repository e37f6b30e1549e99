// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Provide thread-backed FIFO lanes and a host clock for development runs.
// Author: Lukas Bower
//! Host backends that stand in for the second core's peripherals.
//!
//! Two threads play the two cores. Each direction of the link is a lane of
//! [`FIFO_DEPTH`] words guarded by a mutex, with condition variables standing
//! in for the FIFO's `VLD`/`RDY` status bits.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use heapless::Deque;
use log::trace;

use crate::fifo::{Mailbox, FIFO_DEPTH};
use crate::launch::LaunchPort;
use crate::timer::Clock;

#[derive(Debug)]
struct Lane {
    slots: Mutex<Deque<u32, FIFO_DEPTH>>,
    readable: Condvar,
    writable: Condvar,
}

impl Lane {
    fn new() -> Self {
        Self {
            slots: Mutex::new(Deque::new()),
            readable: Condvar::new(),
            writable: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Deque<u32, FIFO_DEPTH>> {
        // A peer that panicked mid-push leaves a consistent deque behind.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, word: u32) {
        let mut slots = self.lock();
        while slots.is_full() {
            slots = self
                .writable
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
        let pushed = slots.push_back(word);
        debug_assert!(pushed.is_ok(), "lane overran FIFO_DEPTH");
        drop(slots);
        self.readable.notify_one();
    }

    fn pop(&self) -> u32 {
        let mut slots = self.lock();
        loop {
            if let Some(word) = slots.pop_front() {
                drop(slots);
                self.writable.notify_one();
                return word;
            }
            slots = self
                .readable
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn drain(&self) -> usize {
        let mut slots = self.lock();
        let dropped = slots.len();
        slots.clear();
        drop(slots);
        if dropped > 0 {
            self.writable.notify_all();
        }
        dropped
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// One core's view of a host FIFO pair.
#[derive(Debug)]
pub struct FifoEndpoint {
    name: &'static str,
    tx: Arc<Lane>,
    rx: Arc<Lane>,
}

/// Create the two cross-wired endpoints of a host link, `(core0, core1)`.
#[must_use]
pub fn fifo_pair() -> (FifoEndpoint, FifoEndpoint) {
    let to_core1 = Arc::new(Lane::new());
    let to_core0 = Arc::new(Lane::new());
    (
        FifoEndpoint {
            name: "core0",
            tx: Arc::clone(&to_core1),
            rx: Arc::clone(&to_core0),
        },
        FifoEndpoint {
            name: "core1",
            tx: to_core0,
            rx: to_core1,
        },
    )
}

impl FifoEndpoint {
    /// Words waiting on the inbound lane.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Words queued on the outbound lane that the peer has not popped yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tx.len()
    }

    /// Discard every word waiting on the inbound lane.
    pub fn drain(&mut self) -> usize {
        let dropped = self.rx.drain();
        if dropped > 0 {
            trace!(target: "hal-fifo", "[fifo] {} drained {dropped} stale words", self.name);
        }
        dropped
    }
}

impl Mailbox for FifoEndpoint {
    fn send(&mut self, word: u32) {
        self.tx.push(word);
    }

    fn receive(&mut self) -> u32 {
        self.rx.pop()
    }
}

impl LaunchPort for FifoEndpoint {
    fn drain(&mut self) {
        let _ = FifoEndpoint::drain(self);
    }
}

/// Microsecond clock anchored at a shared origin.
///
/// Copies share the origin, so readings taken on different threads are
/// directly comparable.
#[derive(Clone, Copy, Debug)]
pub struct HostClock {
    origin: Instant,
}

impl HostClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for HostClock {
    fn now_us(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}
