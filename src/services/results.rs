//! Batch submission of execution results recorded against test cases.

use futures_util::future::join_all;
use tracing::{info, warn};

use super::batch::BatchReport;
use crate::api::ModuleCaseStore;
use crate::models::{TestCase, TestCaseResult, UpdateTestCaseRequest};

/// A result edit for one case.
#[derive(Debug, Clone)]
pub struct CaseEdit {
    pub case: TestCase,
    pub result: TestCaseResult,
    pub actual: Option<String>,
    pub remarks: Option<String>,
}

impl CaseEdit {
    pub fn new(case: TestCase, result: TestCaseResult) -> Self {
        CaseEdit {
            actual: case.actual.clone(),
            remarks: case.remarks.clone(),
            case,
            result,
        }
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Update carrying the case's descriptive fields unchanged.
    fn request(&self) -> UpdateTestCaseRequest {
        UpdateTestCaseRequest {
            result: Some(self.result),
            actual: self.actual.clone(),
            remarks: self.remarks.clone(),
            ..UpdateTestCaseRequest::preserving(&self.case)
        }
    }
}

/// Submit every edit concurrently; each failure is reported, none aborts
/// the batch.
pub async fn submit_results<S>(store: &S, edits: &[CaseEdit]) -> BatchReport
where
    S: ModuleCaseStore + ?Sized,
{
    let mut report = BatchReport::default();

    let (valid, invalid): (Vec<&CaseEdit>, Vec<&CaseEdit>) = edits
        .iter()
        .partition(|e| !e.case.module_id.trim().is_empty() && !e.case.id.trim().is_empty());
    for edit in invalid {
        report.record_failure(
            &display_id(&edit.case),
            "Module ID and test case ID are required".to_string(),
        );
    }

    let requests: Vec<UpdateTestCaseRequest> = valid.iter().map(|e| e.request()).collect();
    let updates = valid
        .iter()
        .zip(&requests)
        .map(|(edit, request)| store.update_case(&edit.case.module_id, &edit.case.id, request));
    let results = join_all(updates).await;

    for (edit, result) in valid.iter().zip(results) {
        match result {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                warn!("Failed to save result for test case {}: {}", display_id(&edit.case), e);
                report.record_failure(&display_id(&edit.case), e.user_message());
            }
        }
    }

    info!(
        "Submitted {} results: {} saved, {} failed",
        edits.len(),
        report.succeeded,
        report.failures.len()
    );
    report
}

fn display_id(case: &TestCase) -> String {
    if case.test_case_id.is_empty() {
        case.id.clone()
    } else {
        case.test_case_id.clone()
    }
}
