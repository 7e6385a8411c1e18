//! Align test case attributes with their module's attribute schema.

use std::collections::HashSet;

use futures_util::future::join_all;
use tracing::{info, warn};

use super::batch::BatchReport;
use crate::api::ModuleCaseStore;
use crate::error::{AppError, AppResult};
use crate::models::{ModuleAttribute, TestCase, TestCaseAttribute, UpdateTestCaseRequest};

/// Merge a case's attributes with the module schema.
///
/// Schema keys come first, in schema order, keeping the value of the first
/// existing entry with that key (empty otherwise). Existing keys the schema
/// does not define follow, first occurrence only. Applying the merge to its
/// own output changes nothing.
pub fn merge_attributes(
    schema: &[ModuleAttribute],
    existing: &[TestCaseAttribute],
) -> Vec<TestCaseAttribute> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::with_capacity(schema.len() + existing.len());

    for attr in schema {
        if !seen.insert(attr.key.as_str()) {
            continue;
        }
        let value = existing
            .iter()
            .find(|e| e.key == attr.key)
            .map(|e| e.value.clone())
            .unwrap_or_default();
        merged.push(TestCaseAttribute::new(attr.key.clone(), value));
    }

    for attr in existing {
        if seen.insert(attr.key.as_str()) {
            merged.push(attr.clone());
        }
    }

    merged
}

/// Rewrite the attributes of every case in a module so they follow the
/// module schema.
///
/// Cases whose attributes would not change are skipped. Updates run
/// concurrently and each failure is collected on the report.
pub async fn sync_module_attributes<S>(store: &S, module_id: &str) -> AppResult<BatchReport>
where
    S: ModuleCaseStore + ?Sized,
{
    if module_id.trim().is_empty() {
        return Err(AppError::InvalidInput("Module ID is required".to_string()));
    }

    let (schema, cases) = tokio::try_join!(
        store.module_schema(module_id),
        store.module_cases(module_id)
    )?;

    let mut report = BatchReport::default();
    let mut pending: Vec<(&TestCase, UpdateTestCaseRequest)> = Vec::new();

    for case in &cases {
        let merged = merge_attributes(&schema, &case.attributes);
        if merged == case.attributes {
            report.unchanged += 1;
            continue;
        }
        let request = UpdateTestCaseRequest {
            attributes: Some(merged),
            ..UpdateTestCaseRequest::preserving(case)
        };
        pending.push((case, request));
    }

    let updates = pending
        .iter()
        .map(|(case, request)| store.update_case(module_id, &case.id, request));
    let results = join_all(updates).await;

    for ((case, _), result) in pending.iter().zip(results) {
        match result {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                warn!("Failed to sync attributes for test case {}: {}", case.test_case_id, e);
                report.record_failure(&case.test_case_id, e.user_message());
            }
        }
    }

    info!(
        "Attribute sync for module {}: {} updated, {} unchanged, {} failed",
        module_id,
        report.succeeded,
        report.unchanged,
        report.failures.len()
    );

    Ok(report)
}
