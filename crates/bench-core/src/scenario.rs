// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define benchmark scenario descriptors and their timing results.
// Author: Lukas Bower
//! Scenario descriptors and per-scenario timing results.

use core::fmt;

/// How many execution contexts a scenario uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contexts {
    /// Both kernels run back to back on the first core.
    Single,
    /// The `f32` kernel runs on the worker while the `f64` kernel runs locally.
    Dual,
}

impl Contexts {
    /// Label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single-core",
            Self::Dual => "dual-core",
        }
    }
}

/// One benchmark configuration: context count and cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScenarioKind {
    /// Execution contexts in use.
    pub contexts: Contexts,
    /// Cache enable bit applied before the scenario runs.
    pub cache_enabled: bool,
}

impl ScenarioKind {
    /// The four scenarios in the order the harness runs them.
    pub const SEQUENCE: [ScenarioKind; 4] = [
        ScenarioKind::new(Contexts::Single, true),
        ScenarioKind::new(Contexts::Single, false),
        ScenarioKind::new(Contexts::Dual, true),
        ScenarioKind::new(Contexts::Dual, false),
    ];

    /// Construct a scenario descriptor.
    #[must_use]
    pub const fn new(contexts: Contexts, cache_enabled: bool) -> Self {
        Self {
            contexts,
            cache_enabled,
        }
    }

    /// Position of this scenario inside [`ScenarioKind::SEQUENCE`].
    #[must_use]
    pub const fn index(self) -> usize {
        let base = match self.contexts {
            Contexts::Single => 0,
            Contexts::Dual => 2,
        };
        if self.cache_enabled {
            base
        } else {
            base + 1
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = if self.cache_enabled { "on" } else { "off" };
        write!(f, "{:<11} cache={cache:<3}", self.contexts.as_str())
    }
}

/// Microsecond timings collected by one scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScenarioResult {
    /// `f32` kernel time; reported by the worker in dual-core runs.
    pub single_us: u64,
    /// `f64` kernel time, always measured on the first core.
    pub double_us: u64,
    /// Wall-clock span bracketing the whole scenario.
    pub total_us: u64,
}

impl ScenarioResult {
    /// Field-wise minimum of two results.
    #[must_use]
    pub fn best_of(self, other: Self) -> Self {
        Self {
            single_us: self.single_us.min(other.single_us),
            double_us: self.double_us.min(other.double_us),
            total_us: self.total_us.min(other.total_us),
        }
    }
}

/// A scenario descriptor paired with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Which scenario ran.
    pub kind: ScenarioKind,
    /// What it measured.
    pub result: ScenarioResult,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  f32={:>9} us  f64={:>9} us",
            self.kind, self.result.single_us, self.result.double_us
        )?;
        if self.kind.contexts == Contexts::Dual {
            write!(f, "  total={:>9} us", self.result.total_us)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    #[test]
    fn sequence_indices_match_positions() {
        for (idx, kind) in ScenarioKind::SEQUENCE.iter().enumerate() {
            assert_eq!(kind.index(), idx);
        }
    }

    #[test]
    fn total_is_shown_only_for_dual_core() {
        let result = ScenarioResult {
            single_us: 10,
            double_us: 20,
            total_us: 25,
        };
        let single = ScenarioReport {
            kind: ScenarioKind::new(Contexts::Single, true),
            result,
        };
        let dual = ScenarioReport {
            kind: ScenarioKind::new(Contexts::Dual, false),
            result,
        };
        let single_line = format!("{single}");
        let dual_line = format!("{dual}");
        assert!(single_line.starts_with("single-core cache=on "));
        assert!(!single_line.contains("total"));
        assert!(dual_line.contains("cache=off"));
        assert!(dual_line.ends_with("total=       25 us"));
    }

    #[test]
    fn best_of_takes_fieldwise_minimum() {
        let a = ScenarioResult {
            single_us: 5,
            double_us: 9,
            total_us: 12,
        };
        let b = ScenarioResult {
            single_us: 7,
            double_us: 3,
            total_us: 12,
        };
        assert_eq!(
            a.best_of(b),
            ScenarioResult {
                single_us: 5,
                double_us: 3,
                total_us: 12
            }
        );
    }
}
