// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Load and validate benchmark configuration from TOML and the environment.
// Author: Lukas Bower
//! Benchmark configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the iteration count.
pub const ITERATIONS_ENV: &str = "DUALCORE_BENCH_ITERATIONS";
/// Iteration count used when nothing else is configured.
pub const DEFAULT_ITERATIONS: i32 = 100_000;

/// Errors produced while assembling a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for [`BenchConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// An environment override did not parse.
    #[error("{var}={value:?} is not a valid iteration count")]
    Env {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
    },
    /// Iteration count is zero or negative.
    #[error("iterations must be positive, got {0}")]
    Iterations(i32),
    /// Round count is zero.
    #[error("rounds must be at least 1")]
    Rounds,
}

/// Settings for one benchmark invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Terms computed by every kernel invocation.
    pub iterations: i32,
    /// Number of times the four-scenario sequence runs.
    pub rounds: u32,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            rounds: 1,
            log_level: "info".to_owned(),
        }
    }
}

impl BenchConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply [`ITERATIONS_ENV`] when it is set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(ITERATIONS_ENV) {
            self.iterations = value.trim().parse().map_err(|_| ConfigError::Env {
                var: ITERATIONS_ENV,
                value,
            })?;
        }
        Ok(())
    }

    /// Reject settings the harness cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations <= 0 {
            return Err(ConfigError::Iterations(self.iterations));
        }
        if self.rounds == 0 {
            return Err(ConfigError::Rounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(BenchConfig::from_toml_str("").unwrap(), BenchConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let cfg = BenchConfig::from_toml_str("rounds = 3\n").unwrap();
        assert_eq!(cfg.rounds, 3);
        assert_eq!(cfg.iterations, DEFAULT_ITERATIONS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            BenchConfig::from_toml_str("cores = 4\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut cfg = BenchConfig {
            iterations: -1,
            ..BenchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Iterations(-1))));
        cfg.iterations = 10;
        cfg.rounds = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Rounds)));
        cfg.rounds = 1;
        assert!(cfg.validate().is_ok());
    }
}
