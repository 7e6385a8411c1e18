//! Progress statistics derived for a test run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{TestCase, TestCaseResult, TestRunStatus};

/// Rounded percentage of `part` in `total`, 0 when `total` is 0.
pub fn completion_percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

/// Pass/fail/pending counts over a list of cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaseTally {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    /// Everything neither passed nor failed, Blocked included
    pub pending: u32,
}

impl CaseTally {
    pub fn from_cases(cases: &[TestCase]) -> Self {
        let total = cases.len() as u32;
        let passed = cases
            .iter()
            .filter(|c| c.result() == TestCaseResult::Pass)
            .count() as u32;
        let failed = cases
            .iter()
            .filter(|c| c.result() == TestCaseResult::Fail)
            .count() as u32;
        CaseTally {
            total,
            passed,
            failed,
            pending: total - passed - failed,
        }
    }

    pub fn executed(&self) -> u32 {
        self.passed + self.failed
    }

    pub fn completion(&self) -> u32 {
        completion_percent(self.passed, self.total)
    }

    fn add(&mut self, other: &CaseTally) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.pending += other.pending;
    }
}

/// Per-suite breakdown within a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteStats {
    pub suite_id: String,
    pub suite_name: String,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub pending: u32,
    pub completion: u32,
}

impl SuiteStats {
    pub fn new(suite_id: String, suite_name: String, tally: CaseTally) -> Self {
        SuiteStats {
            suite_id,
            suite_name,
            total: tally.total,
            passed: tally.passed,
            failed: tally.failed,
            pending: tally.pending,
            completion: tally.completion(),
        }
    }

    fn tally(&self) -> CaseTally {
        CaseTally {
            total: self.total,
            passed: self.passed,
            failed: self.failed,
            pending: self.pending,
        }
    }
}

/// Descriptive fields of the run, carried for display and exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub description: String,
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Status stored on the server when the stats were computed
    pub stored_status: TestRunStatus,
}

/// Aggregated progress of a run across all assigned suites.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub run_id: String,
    pub run_name: String,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub pending: u32,
    pub completion: u32,
    /// Status derived from the case results
    pub status: TestRunStatus,
    pub suites: Vec<SuiteStats>,
    pub metadata: RunMetadata,
}

impl RunStats {
    /// Sum suite breakdowns into run totals and derive the status.
    pub fn from_suites(
        run_id: String,
        run_name: String,
        suites: Vec<SuiteStats>,
        metadata: RunMetadata,
    ) -> Self {
        let mut totals = CaseTally::default();
        for suite in &suites {
            totals.add(&suite.tally());
        }

        RunStats {
            run_id,
            run_name,
            total: totals.total,
            passed: totals.passed,
            failed: totals.failed,
            pending: totals.pending,
            completion: totals.completion(),
            status: TestRunStatus::derive(totals.executed(), totals.total),
            suites,
            metadata,
        }
    }
}
