// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Defines the dualcore-bench library and public module surface.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Host runner for the dual-core cache benchmark.
//!
//! Two threads stand in for the two cores: the calling thread runs the
//! harness, a `core1` thread runs the worker loop after completing the launch
//! handshake. Configuration comes from an optional TOML file, the
//! environment and the command line, in that order of precedence.

pub mod cli;
pub mod config;
pub mod host;
pub mod report;

pub use config::{BenchConfig, ConfigError};
pub use host::{HostBench, HostError};
