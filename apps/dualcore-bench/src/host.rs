// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Launch the worker thread and drive the harness on the host.
// Author: Lukas Bower
//! Host-side two-context runtime.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use bench_core::{Harness, HarnessError, Link, ScenarioReport, Worker, WorkerExit};
use bench_hal::cache::CTRL_RESET;
use bench_hal::host::{fifo_pair, FifoEndpoint, HostClock};
use bench_hal::launch::{await_launch, launch_core1, LaunchVector};
use bench_hal::{CacheController, SimRegister};
use log::{debug, info};
use thiserror::Error;

/// Launch vector passed to the worker thread. The words only have to be
/// non-zero on the host; they mirror a flash image entry on the real part.
pub const HOST_LAUNCH_VECTOR: LaunchVector = LaunchVector {
    vector_table: 0x1000_0100,
    stack_pointer: 0x2004_1000,
    entry: 0x1000_01c1,
};

/// Failures of the host runtime.
#[derive(Debug, Error)]
pub enum HostError {
    /// The worker thread could not be created.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// The worker thread panicked.
    #[error("worker thread panicked")]
    WorkerPanicked,
    /// The harness refused a request or the worker rejected a job.
    #[error(transparent)]
    Harness(#[from] HarnessError),
}

/// Harness specialised to the host backends.
pub type HostHarness = Harness<FifoEndpoint, Arc<SimRegister>, HostClock>;

/// Running benchmark: harness on the calling thread, worker on `core1`.
pub struct HostBench {
    harness: HostHarness,
    worker: Option<JoinHandle<WorkerExit>>,
    register: Arc<SimRegister>,
}

impl HostBench {
    /// Spawn the worker, complete the launch handshake and build the harness.
    pub fn start(iterations: i32) -> Result<Self, HostError> {
        let (core0, mut core1) = fifo_pair();
        let register = Arc::new(SimRegister::new(CTRL_RESET));
        let clock = HostClock::new();
        let cache = CacheController::new(Arc::clone(&register));
        let view = cache.view();
        let mut harness = Harness::new(Link::new(core0, cache), clock, iterations)?;

        let worker = thread::Builder::new()
            .name("core1".to_owned())
            .spawn(move || {
                let vector = await_launch(&mut core1);
                debug!(target: "worker", "[worker] launched entry=0x{:08x}", vector.entry);
                Worker::new(core1, clock, view).run()
            })?;

        let restarts = launch_core1(harness.link_mut().mailbox_mut(), &HOST_LAUNCH_VECTOR);
        info!(
            target: "harness",
            "[harness] worker online after {restarts} handshake restarts; iterations={iterations}"
        );

        Ok(Self {
            harness,
            worker: Some(worker),
            register,
        })
    }

    /// Run the four scenarios once.
    pub fn run_all(&mut self) -> Result<[ScenarioReport; 4], HostError> {
        Ok(self.harness.run_all()?)
    }

    /// Direct access to the harness.
    pub fn harness_mut(&mut self) -> &mut HostHarness {
        &mut self.harness
    }

    /// Raw value of the simulated cache control register.
    #[must_use]
    pub fn control_register(&self) -> u32 {
        use bench_hal::Register32;
        self.register.read()
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(mut self) -> Result<WorkerExit, HostError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<WorkerExit, HostError> {
        let Some(worker) = self.worker.take() else {
            return Ok(WorkerExit::default());
        };
        self.harness.shutdown();
        worker.join().map_err(|_| HostError::WorkerPanicked)
    }
}

impl Drop for HostBench {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
