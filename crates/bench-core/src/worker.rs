// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Implement the second-core job loop that runs kernels and reports timings.
// Author: Lukas Bower
//! Worker loop for the second execution context.
//!
//! Each round walks `AWAIT_SELECTOR -> AWAIT_PARAMETER -> COMPUTE ->
//! PUBLISH_RESULT`. The parameter word is consumed even when the selector is
//! unknown so the next round starts on a frame boundary; the reply is then
//! [`RESULT_REJECTED`](bench_proto::RESULT_REJECTED) instead of a timing.
//! The shutdown selector ends the loop without a reply.

use core::hint::black_box;

use bench_hal::{measure, CacheView, Clock, Mailbox, Register32};
use bench_proto::{decode_iterations, KernelVariant, ProtocolError, Reply, Selector};
use log::{debug, error, info};

use crate::kernels;

/// Outcome of a single protocol round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A kernel ran and its timing was published.
    Completed {
        /// Kernel that ran.
        variant: KernelVariant,
        /// Iteration count it ran with.
        iterations: i32,
        /// Measured duration before narrowing to a reply word.
        elapsed_us: u64,
    },
    /// The selector was unknown; a rejection was published.
    Rejected {
        /// The offending selector word.
        selector: u32,
    },
    /// The shutdown selector arrived.
    Shutdown,
}

/// Counters returned when the worker loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerExit {
    /// Jobs that ran to completion.
    pub completed: u32,
    /// Jobs refused because of an unknown selector.
    pub rejected: u32,
}

/// Second-core job runner.
pub struct Worker<M, C, R>
where
    M: Mailbox,
    C: Clock,
    R: Register32,
{
    mailbox: M,
    clock: C,
    cache: CacheView<R>,
    exit: WorkerExit,
}

impl<M, C, R> Worker<M, C, R>
where
    M: Mailbox,
    C: Clock,
    R: Register32,
{
    /// Build a worker around its mailbox endpoint, clock and cache view.
    pub fn new(mailbox: M, clock: C, cache: CacheView<R>) -> Self {
        Self {
            mailbox,
            clock,
            cache,
            exit: WorkerExit::default(),
        }
    }

    /// Counters accumulated so far.
    #[must_use]
    pub fn stats(&self) -> WorkerExit {
        self.exit
    }

    /// Run one protocol round, blocking on the mailbox as needed.
    pub fn step(&mut self) -> Step {
        let selector = match Selector::decode(self.mailbox.receive()) {
            Ok(Selector::Shutdown) => return Step::Shutdown,
            Ok(Selector::Kernel(variant)) => Ok(variant),
            Err(err) => Err(err),
        };
        let iterations = decode_iterations(self.mailbox.receive());

        match selector {
            Ok(variant) => {
                let cache_enabled = self.cache.get_enabled();
                let (_, elapsed_us) = measure(&self.clock, || {
                    black_box(kernels::run(variant, black_box(iterations)))
                });
                self.mailbox.send(Reply::from_elapsed(elapsed_us).encode());
                self.exit.completed += 1;
                debug!(
                    target: "worker",
                    "[worker] {variant} x{iterations} cache={cache_enabled} took {elapsed_us} us"
                );
                Step::Completed {
                    variant,
                    iterations,
                    elapsed_us,
                }
            }
            Err(ProtocolError::UnknownSelector(selector)) => {
                self.mailbox.send(Reply::Rejected.encode());
                self.exit.rejected += 1;
                error!(
                    target: "worker",
                    "[worker] rejected job: {}",
                    ProtocolError::UnknownSelector(selector)
                );
                Step::Rejected { selector }
            }
        }
    }

    /// Serve jobs until the shutdown selector arrives.
    pub fn run(mut self) -> WorkerExit {
        info!(target: "worker", "[worker] ready");
        while self.step() != Step::Shutdown {}
        info!(
            target: "worker",
            "[worker] shutdown completed={} rejected={}",
            self.exit.completed,
            self.exit.rejected
        );
        self.exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_hal::host::{fifo_pair, FifoEndpoint, HostClock};
    use bench_hal::{CacheController, SimRegister};
    use bench_proto::{Job, RESULT_REJECTED, SELECTOR_SHUTDOWN};
    use std::sync::Arc;

    fn worker_on(endpoint: FifoEndpoint) -> Worker<FifoEndpoint, HostClock, Arc<SimRegister>> {
        let cache = CacheController::new(Arc::new(SimRegister::new(1)));
        Worker::new(endpoint, HostClock::new(), cache.view())
    }

    #[test]
    fn job_round_publishes_timing() {
        let (mut harness, core1) = fifo_pair();
        let mut worker = worker_on(core1);
        for word in Job::new(KernelVariant::Single, 1_000).encode() {
            harness.send(word);
        }

        let step = worker.step();
        let reply = Reply::decode(harness.receive());
        match (step, reply) {
            (
                Step::Completed {
                    variant,
                    iterations,
                    elapsed_us,
                },
                Reply::Elapsed(published),
            ) => {
                assert_eq!(variant, KernelVariant::Single);
                assert_eq!(iterations, 1_000);
                assert_eq!(u64::from(published), elapsed_us);
            }
            other => panic!("unexpected round {other:?}"),
        }
        assert_eq!(worker.stats().completed, 1);
    }

    #[test]
    fn unknown_selector_is_rejected_and_framing_survives() {
        let (mut harness, core1) = fifo_pair();
        let mut worker = worker_on(core1);
        harness.send(0x1000_0abc);
        harness.send(500);
        for word in Job::new(KernelVariant::Double, 10).encode() {
            harness.send(word);
        }

        assert_eq!(worker.step(), Step::Rejected { selector: 0x1000_0abc });
        assert_eq!(harness.receive(), RESULT_REJECTED);
        assert!(matches!(
            worker.step(),
            Step::Completed {
                variant: KernelVariant::Double,
                iterations: 10,
                ..
            }
        ));
        assert!(matches!(Reply::decode(harness.receive()), Reply::Elapsed(_)));
        assert_eq!(
            worker.stats(),
            WorkerExit {
                completed: 1,
                rejected: 1
            }
        );
    }

    #[test]
    fn shutdown_ends_loop_without_reply() {
        let (mut harness, core1) = fifo_pair();
        let worker = worker_on(core1);
        for word in Job::new(KernelVariant::Single, 5).encode() {
            harness.send(word);
        }
        harness.send(SELECTOR_SHUTDOWN);

        let exit = worker.run();
        assert_eq!(exit.completed, 1);
        assert!(matches!(Reply::decode(harness.receive()), Reply::Elapsed(_)));
        assert_eq!(harness.pending(), 0);
    }
}
