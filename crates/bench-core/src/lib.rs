// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Defines the bench-core library and public module surface.
// Author: Lukas Bower
#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Worker loop and timing harness for the dual-core cache benchmark.
//!
//! The harness runs on the first core and owns the cache controller and the
//! outbound side of the mailbox. The worker runs on the second core, answers
//! one job at a time and only ever observes the cache state.

#[cfg(test)]
extern crate std;

pub mod harness;
pub mod kernels;
pub mod scenario;
pub mod worker;

pub use harness::{Harness, HarnessError, Link, PendingJob};
pub use scenario::{Contexts, ScenarioKind, ScenarioReport, ScenarioResult};
pub use worker::{Step, Worker, WorkerExit};
