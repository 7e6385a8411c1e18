//! Outcome of a batch of independent per-item writes.

use serde::Serialize;

/// A single failed item in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// Business id of the test case (falls back to the record id)
    pub test_case_id: String,
    pub message: String,
}

/// Aggregated report; one failed item never stops the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub succeeded: usize,
    /// Items skipped because no write was needed
    pub unchanged: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub(crate) fn record_failure(&mut self, test_case_id: &str, message: String) {
        self.failures.push(BatchFailure {
            test_case_id: test_case_id.to_string(),
            message,
        });
    }
}
