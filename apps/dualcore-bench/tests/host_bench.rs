// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: End-to-end runs of the host benchmark across both contexts.
// Author: Lukas Bower

use std::time::{Duration, Instant};

use bench_core::scenario::Contexts;
use bench_core::ScenarioKind;
use bench_hal::cache::CTRL_RESET;
use bench_proto::ELAPSED_MAX;
use dualcore_bench::{HostBench, HostError};
use serial_test::serial;

#[test]
#[serial]
fn full_sequence_completes_in_order() {
    const ROUNDS: u32 = 3;
    let mut bench = HostBench::start(100_000).unwrap();

    for _ in 0..ROUNDS {
        let started = Instant::now();
        let reports = bench.run_all().unwrap();
        assert!(started.elapsed() < Duration::from_secs(10));

        for (report, kind) in reports.iter().zip(ScenarioKind::SEQUENCE) {
            assert_eq!(report.kind, kind);
            let result = report.result;
            assert!(result.single_us <= 10_000_000);
            assert!(result.double_us <= 10_000_000);
            assert!(result.total_us <= 10_000_000);
            if kind.contexts == Contexts::Dual {
                assert!(result.single_us < u64::from(ELAPSED_MAX));
                assert!(result.total_us >= result.single_us.max(result.double_us));
            } else {
                assert!(result.total_us >= result.single_us + result.double_us);
            }
        }
    }

    let exit = bench.shutdown().unwrap();
    assert_eq!(exit.completed, 2 * ROUNDS);
    assert_eq!(exit.rejected, 0);
}

#[test]
#[serial]
fn cache_register_is_restored_after_each_round() {
    let mut bench = HostBench::start(1_000).unwrap();
    assert_eq!(bench.control_register(), CTRL_RESET);
    for _ in 0..3 {
        bench.run_all().unwrap();
        assert_eq!(bench.control_register(), CTRL_RESET);
    }
    let exit = bench.shutdown().unwrap();
    assert_eq!(exit.completed, 6);
}

#[test]
#[serial]
fn harness_can_run_individual_scenarios() {
    let mut bench = HostBench::start(5_000).unwrap();
    let dual_off = ScenarioKind::SEQUENCE[3];
    let report = bench.harness_mut().run(dual_off).unwrap();
    assert_eq!(report.kind, dual_off);
    assert_eq!(bench.control_register() & 1, 0);
    drop(bench);
}

#[test]
fn non_positive_iterations_are_refused_before_spawning() {
    assert!(matches!(HostBench::start(0), Err(HostError::Harness(_))));
    assert!(matches!(HostBench::start(-5), Err(HostError::Harness(_))));
}
