// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Parse command-line flags and merge them over file and environment settings.
// Author: Lukas Bower
//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{BenchConfig, ConfigError};

/// Compare kernel timings across {single, dual} core x {cache on, cache off}.
#[derive(Debug, Parser, Clone)]
#[command(name = "dualcore-bench", version, about)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Kernel iteration count (overrides file and environment).
    #[arg(long)]
    pub iterations: Option<i32>,

    /// Number of times to run the four scenarios.
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Log filter (`error`, `warn`, `info`, `debug`, `trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Incremental verbosity (`-v`, `-vv`).
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Build the effective configuration: file, then environment, then flags.
    pub fn resolve(&self) -> Result<BenchConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };
        config.apply_env()?;
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(level) = &self.log_level {
            config.log_level.clone_from(level);
        }
        match self.verbose {
            0 => {}
            1 => config.log_level = "debug".to_owned(),
            _ => config.log_level = "trace".to_owned(),
        }
        config.validate()?;
        Ok(config)
    }
}
