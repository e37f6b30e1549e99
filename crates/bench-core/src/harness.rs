// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Sequence the benchmark scenarios and dispatch jobs to the worker core.
// Author: Lukas Bower
//! First-core dispatch and timing harness.
//!
//! [`Link`] owns the first core's mailbox endpoint together with the only
//! [`CacheController`]. Dispatching a job hands back a [`PendingJob`] that
//! mutably borrows the link until the reply is collected, so the cache bit
//! cannot be toggled while the worker is computing.

use core::hint::black_box;

use bench_hal::{elapsed_us, measure, CacheController, Clock, Mailbox, Register32};
use bench_proto::{Job, KernelVariant, Reply, SELECTOR_SHUTDOWN};
use log::{debug, info, warn};
use thiserror::Error;

use crate::kernels;
use crate::scenario::{Contexts, ScenarioKind, ScenarioReport, ScenarioResult};

/// Failures surfaced by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// The worker did not recognise the selector it was sent.
    #[error("worker rejected {variant} job")]
    WorkerRejected {
        /// Variant whose selector was refused.
        variant: KernelVariant,
    },
    /// Iteration counts must be positive.
    #[error("iteration count must be positive, got {0}")]
    InvalidIterations(i32),
}

/// First-core side of the inter-core link plus the cache register it owns.
pub struct Link<M: Mailbox, R: Register32> {
    mailbox: M,
    cache: CacheController<R>,
}

impl<M: Mailbox, R: Register32> Link<M, R> {
    /// Pair a mailbox endpoint with the cache controller.
    pub fn new(mailbox: M, cache: CacheController<R>) -> Self {
        Self { mailbox, cache }
    }

    /// Current cache enable state.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.cache.get_enabled()
    }

    /// Apply a cache enable state; returns the previous one.
    pub fn set_cache(&mut self, enabled: bool) -> bool {
        self.cache.set_enabled(enabled)
    }

    /// Send `job` to the worker. The reply must be collected through the
    /// returned handle before the link can be used again.
    pub fn dispatch(&mut self, job: Job) -> PendingJob<'_, M, R> {
        let [selector, parameter] = job.encode();
        self.mailbox.send(selector);
        self.mailbox.send(parameter);
        debug!(
            target: "harness",
            "[harness] dispatched {} x{}",
            job.variant,
            job.iterations
        );
        PendingJob { link: self, job }
    }

    /// Raw mailbox access for bring-up traffic such as the launch handshake.
    /// Must not be used while the worker loop is serving jobs.
    pub fn mailbox_mut(&mut self) -> &mut M {
        &mut self.mailbox
    }

    /// Ask the worker loop to exit.
    pub fn shutdown(&mut self) {
        info!(target: "harness", "[harness] sending shutdown");
        self.mailbox.send(SELECTOR_SHUTDOWN);
    }

    /// Split the link back into its parts.
    pub fn into_parts(self) -> (M, CacheController<R>) {
        (self.mailbox, self.cache)
    }
}

/// A job in flight on the worker.
#[must_use = "an uncollected reply desynchronises the mailbox"]
pub struct PendingJob<'a, M: Mailbox, R: Register32> {
    link: &'a mut Link<M, R>,
    job: Job,
}

impl<M: Mailbox, R: Register32> PendingJob<'_, M, R> {
    /// Block until the worker replies; returns its elapsed microseconds.
    pub fn wait(self) -> Result<u64, HarnessError> {
        let PendingJob { link, job } = self;
        match Reply::decode(link.mailbox.receive()) {
            Reply::Elapsed(us) => Ok(u64::from(us)),
            Reply::Rejected => {
                warn!(target: "harness", "[harness] worker rejected {} job", job.variant);
                Err(HarnessError::WorkerRejected {
                    variant: job.variant,
                })
            }
        }
    }
}

/// Runs the benchmark scenarios from the first core.
pub struct Harness<M: Mailbox, R: Register32, C: Clock> {
    link: Link<M, R>,
    clock: C,
    iterations: i32,
}

impl<M, R, C> Harness<M, R, C>
where
    M: Mailbox,
    R: Register32,
    C: Clock,
{
    /// Build a harness running every kernel for `iterations` terms.
    pub fn new(link: Link<M, R>, clock: C, iterations: i32) -> Result<Self, HarnessError> {
        if iterations <= 0 {
            return Err(HarnessError::InvalidIterations(iterations));
        }
        Ok(Self {
            link,
            clock,
            iterations,
        })
    }

    /// Mutably borrow the link.
    pub fn link_mut(&mut self) -> &mut Link<M, R> {
        &mut self.link
    }

    /// Time both kernels back to back on this core.
    pub fn run_single(&mut self, cache_enabled: bool) -> ScenarioReport {
        self.link.set_cache(cache_enabled);
        let n = self.iterations;

        let start = self.clock.now_us();
        let (_, single_us) = measure(&self.clock, || black_box(kernels::wallis_f32(black_box(n))));
        let (_, double_us) = measure(&self.clock, || black_box(kernels::wallis_f64(black_box(n))));
        let end = self.clock.now_us();

        let report = ScenarioReport {
            kind: ScenarioKind::new(Contexts::Single, cache_enabled),
            result: ScenarioResult {
                single_us,
                double_us,
                total_us: elapsed_us(start, end),
            },
        };
        debug!(target: "harness", "[harness] {report}");
        report
    }

    /// Run the `f32` kernel on the worker while timing the `f64` kernel here.
    pub fn run_dual(&mut self, cache_enabled: bool) -> Result<ScenarioReport, HarnessError> {
        self.link.set_cache(cache_enabled);
        let n = self.iterations;

        let start = self.clock.now_us();
        let pending = self.link.dispatch(Job::new(KernelVariant::Single, n));
        let (_, double_us) = measure(&self.clock, || black_box(kernels::wallis_f64(black_box(n))));
        let single_us = pending.wait()?;
        let end = self.clock.now_us();

        let report = ScenarioReport {
            kind: ScenarioKind::new(Contexts::Dual, cache_enabled),
            result: ScenarioResult {
                single_us,
                double_us,
                total_us: elapsed_us(start, end),
            },
        };
        debug!(target: "harness", "[harness] {report}");
        Ok(report)
    }

    /// Run one scenario.
    pub fn run(&mut self, kind: ScenarioKind) -> Result<ScenarioReport, HarnessError> {
        match kind.contexts {
            Contexts::Single => Ok(self.run_single(kind.cache_enabled)),
            Contexts::Dual => self.run_dual(kind.cache_enabled),
        }
    }

    /// Run the four scenarios in [`ScenarioKind::SEQUENCE`] order, then put
    /// the cache back the way it was found.
    pub fn run_all(&mut self) -> Result<[ScenarioReport; 4], HarnessError> {
        let previous = self.link.cache_enabled();
        let mut reports = ScenarioKind::SEQUENCE.map(|kind| ScenarioReport {
            kind,
            result: ScenarioResult::default(),
        });

        let mut outcome = Ok(());
        for slot in reports.iter_mut() {
            match self.run(slot.kind) {
                Ok(report) => *slot = report,
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }

        self.link.set_cache(previous);
        outcome.map(|()| reports)
    }

    /// Ask the worker loop to exit.
    pub fn shutdown(&mut self) {
        self.link.shutdown();
    }

    /// Release the link.
    pub fn into_link(self) -> Link<M, R> {
        self.link
    }
}
