// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: CLI entry point for the dual-core cache benchmark.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! CLI entry point for the dual-core cache benchmark.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use dualcore_bench::cli::Cli;
use dualcore_bench::report::{RoundReport, Summary};
use dualcore_bench::HostBench;

fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(level));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve().context("invalid configuration")?;
    init_logging(&config.log_level);
    info!(
        target: "harness",
        "[harness] iterations={} rounds={}",
        config.iterations,
        config.rounds
    );

    let mut bench = HostBench::start(config.iterations).context("failed to start worker")?;
    let mut summary = Summary::new();
    for round in 0..config.rounds {
        let reports = bench
            .run_all()
            .with_context(|| format!("round {} failed", round + 1))?;
        print!(
            "{}",
            RoundReport {
                round,
                reports: &reports,
            }
        );
        summary.record(&reports);
    }
    if summary.rounds() > 1 {
        print!("{summary}");
    }

    let exit = bench.shutdown().context("worker did not stop cleanly")?;
    info!(
        target: "harness",
        "[harness] worker exited: completed={} rejected={}",
        exit.completed,
        exit.rejected
    );
    Ok(())
}
