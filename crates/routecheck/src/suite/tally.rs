//! Per-case results and the pass/fail tally.

use super::cases::CaseKind;
use serde::Serialize;
use std::time::Duration;

/// Outcome of one case
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    /// Which case ran
    pub kind: CaseKind,
    /// Whether the case reported success
    pub passed: bool,
    /// Wall-clock time spent in the case
    pub duration: Duration,
}

/// Pass/fail counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Cases that reported success
    pub passed: usize,
    /// Cases that reported failure
    pub failed: usize,
}

impl Tally {
    /// Count one outcome
    pub fn record(&mut self, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Number of recorded outcomes
    pub const fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// True when nothing failed
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Everything a suite run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    /// Case outcomes in execution order
    pub results: Vec<CaseResult>,
    /// Counters derived from `results`
    pub tally: Tally,
    /// Total run time
    pub duration: Duration,
}

impl SuiteReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case outcome and update the tally
    pub fn record(&mut self, result: CaseResult) {
        self.tally.record(result.passed);
        self.results.push(result);
    }

    /// Cases that failed
    pub fn failures(&self) -> Vec<&CaseResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }
}
