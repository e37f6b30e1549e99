// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Implement both sides of the FIFO handshake that starts the second core.
// Author: Lukas Bower
//! Second-core launch handshake.
//!
//! The second core idles in its boot ROM until the first core feeds it the
//! sequence `[0, 0, 1, vector_table, stack_pointer, entry]` over the
//! inter-core FIFO. Every word is echoed back; a mismatched echo makes the
//! first core restart from the beginning. Leading zeroes resynchronise a
//! second core that saw a partial sequence. Vector words must be non-zero.

use log::{debug, warn};

use crate::barrier::signal_event;
use crate::fifo::{Mailbox, SioFifo};

/// Number of words in a launch sequence.
pub const LAUNCH_WORDS: usize = 6;

/// Mailbox endpoint able to take part in the launch handshake.
pub trait LaunchPort: Mailbox {
    /// Discard stale inbound words.
    fn drain(&mut self);

    /// Wake a peer parked waiting for an event.
    fn signal(&mut self) {}
}

impl LaunchPort for SioFifo {
    fn drain(&mut self) {
        let _ = SioFifo::drain(self);
    }

    fn signal(&mut self) {
        signal_event();
    }
}

/// Entry state handed to the second core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchVector {
    /// Address of the vector table installed on the second core.
    pub vector_table: u32,
    /// Initial stack pointer.
    pub stack_pointer: u32,
    /// Entry point address.
    pub entry: u32,
}

impl LaunchVector {
    /// Encode the vector as the word sequence the boot ROM expects.
    #[must_use]
    pub const fn sequence(&self) -> [u32; LAUNCH_WORDS] {
        [0, 0, 1, self.vector_table, self.stack_pointer, self.entry]
    }
}

/// Drive the first-core side of the handshake. Returns the number of
/// restarts caused by mismatched echoes.
pub fn launch_core1<P: LaunchPort + ?Sized>(port: &mut P, vector: &LaunchVector) -> u32 {
    let sequence = vector.sequence();
    let mut idx = 0;
    let mut restarts = 0;
    while idx < sequence.len() {
        let word = sequence[idx];
        if word == 0 {
            port.drain();
            port.signal();
        }
        port.send(word);
        let echo = port.receive();
        if echo == word {
            idx += 1;
        } else {
            warn!(
                target: "hal-fifo",
                "[launch] echo mismatch at word {idx}: sent 0x{word:08x} got 0x{echo:08x}; restarting"
            );
            idx = 0;
            restarts += 1;
        }
    }
    debug!(
        target: "hal-fifo",
        "[launch] second core accepted entry=0x{:08x} sp=0x{:08x} restarts={restarts}",
        vector.entry,
        vector.stack_pointer,
    );
    restarts
}

/// Drive the second-core side of the handshake: echo each word and return
/// once a complete sequence has been seen.
pub fn await_launch<M: Mailbox + ?Sized>(port: &mut M) -> LaunchVector {
    let mut seq = 0usize;
    let mut words = [0u32; 3];
    while seq < LAUNCH_WORDS {
        let word = port.receive();
        port.send(word);
        seq = match (seq, word) {
            (0, 0) => 1,
            (_, 0) => 2,
            (2, 1) => 3,
            (3..=5, value) => {
                words[seq - 3] = value;
                seq + 1
            }
            _ => 0,
        };
    }
    LaunchVector {
        vector_table: words[0],
        stack_pointer: words[1],
        entry: words[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::{Deque, Vec};

    /// Port whose peer echoes every word, optionally corrupting one of them.
    struct EchoPort {
        sent: Vec<u32, 32>,
        pending: Deque<u32, 4>,
        corrupt_at: Option<usize>,
        drains: u32,
    }

    impl EchoPort {
        fn new(corrupt_at: Option<usize>) -> Self {
            Self {
                sent: Vec::new(),
                pending: Deque::new(),
                corrupt_at,
                drains: 0,
            }
        }
    }

    impl Mailbox for EchoPort {
        fn send(&mut self, word: u32) {
            let position = self.sent.len();
            self.sent.push(word).expect("sent log full");
            let echo = if self.corrupt_at == Some(position) {
                word ^ 0xffff
            } else {
                word
            };
            self.pending.push_back(echo).expect("echo queue full");
        }

        fn receive(&mut self) -> u32 {
            self.pending.pop_front().expect("no echo pending")
        }
    }

    impl LaunchPort for EchoPort {
        fn drain(&mut self) {
            self.drains += 1;
            self.pending.clear();
        }
    }

    /// Scripted inbound words; records what the second core echoes.
    struct Script {
        inbound: Deque<u32, 16>,
        echoed: Vec<u32, 16>,
    }

    impl Mailbox for Script {
        fn send(&mut self, word: u32) {
            self.echoed.push(word).expect("echo log full");
        }

        fn receive(&mut self) -> u32 {
            self.inbound.pop_front().expect("script exhausted")
        }
    }

    const VECTOR: LaunchVector = LaunchVector {
        vector_table: 0x1000_0100,
        stack_pointer: 0x2004_2000,
        entry: 0x1000_02c1,
    };

    #[test]
    fn clean_echo_completes_in_one_pass() {
        let mut port = EchoPort::new(None);
        assert_eq!(launch_core1(&mut port, &VECTOR), 0);
        assert_eq!(port.sent.as_slice(), &VECTOR.sequence());
        assert_eq!(port.drains, 2);
    }

    #[test]
    fn bad_echo_restarts_from_first_word() {
        let mut port = EchoPort::new(Some(3));
        assert_eq!(launch_core1(&mut port, &VECTOR), 1);
        assert_eq!(port.sent.len(), 4 + LAUNCH_WORDS);
        assert_eq!(&port.sent[4..], &VECTOR.sequence());
    }

    #[test]
    fn second_core_resynchronises_after_garbage() {
        let mut inbound = Deque::new();
        for word in [0x77, 0, 0, 0]
            .into_iter()
            .chain([1, VECTOR.vector_table, VECTOR.stack_pointer, VECTOR.entry])
        {
            inbound.push_back(word).expect("script full");
        }
        let mut script = Script {
            inbound,
            echoed: Vec::new(),
        };
        assert_eq!(await_launch(&mut script), VECTOR);
        assert_eq!(script.echoed.len(), 8);
        assert!(script.inbound.is_empty());
    }
}
