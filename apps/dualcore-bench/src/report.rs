// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Render per-round scenario tables and the best-of summary.
// Author: Lukas Bower
//! Console reporting.

use std::fmt;

use bench_core::{ScenarioKind, ScenarioReport, ScenarioResult};

/// One pass over the four scenarios.
#[derive(Debug, Clone, Copy)]
pub struct RoundReport<'a> {
    /// Zero-based round number.
    pub round: u32,
    /// Reports in run order.
    pub reports: &'a [ScenarioReport; 4],
}

impl fmt::Display for RoundReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "round {}", self.round + 1)?;
        for report in self.reports {
            writeln!(f, "  {report}")?;
        }
        Ok(())
    }
}

/// Best timings per scenario across rounds.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    best: [Option<ScenarioResult>; 4],
    rounds: u32,
}

impl Summary {
    /// Empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one round into the summary.
    pub fn record(&mut self, reports: &[ScenarioReport; 4]) {
        for report in reports {
            let slot = &mut self.best[report.kind.index()];
            *slot = Some(match *slot {
                Some(best) => best.best_of(report.result),
                None => report.result,
            });
        }
        self.rounds += 1;
    }

    /// Rounds recorded so far.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Best result for `kind`, if any round has run.
    #[must_use]
    pub fn best(&self, kind: ScenarioKind) -> Option<ScenarioResult> {
        self.best[kind.index()]
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "best of {} rounds", self.rounds)?;
        for kind in ScenarioKind::SEQUENCE {
            if let Some(result) = self.best(kind) {
                writeln!(f, "  {}", ScenarioReport { kind, result })?;
            }
        }
        Ok(())
    }
}
