//! E2E tests: product summary, attribute sync and result submission.

use tcm_lib::models::{TestCaseAttribute, TestCaseResult};
use tcm_lib::services::{CaseEdit, load_product_summary, submit_results, sync_module_attributes};

use super::fixtures::*;
use super::mock_backend::{LOCKED_CASE_ID, MockBackend, MockState};

/// (1) Summary counts per module and version; orphans only add versions.
#[actix_rt::test]
async fn test_product_summary_matrix() {
    let mock = MockBackend::start(MockState {
        modules: vec![module("m1", "Login"), module("m2", "Checkout")],
        cases: vec![
            case("c1", "m1", "v1.0"),
            case("c2", "m1", "v1.0"),
            case("c3", "m2", "v2.0"),
            case("orphan-1", "m9", "v3.0"),
        ],
        ..Default::default()
    })
    .await;
    let client = client_for(&mock);

    let matrix = load_product_summary(&client, PRODUCT_ID).await.unwrap();

    assert_eq!(matrix.modules.len(), 2);
    assert_eq!(matrix.versions, vec!["v3.0", "v2.0", "v1.0"]);
    assert_eq!(matrix.count("m1", "v1.0"), 2);
    assert_eq!(matrix.count("m2", "v2.0"), 1);
    assert_eq!(matrix.count("m2", "v1.0"), 0);
    assert_eq!(matrix.version_total("v3.0"), 0);
    assert_eq!(matrix.module_total("m1"), 2);
    assert_eq!(matrix.grand_total(), 3);
}

/// (2) Sync rewrites only drifted cases and a second pass is a no-op.
#[actix_rt::test]
async fn test_attribute_sync_is_idempotent() {
    let mut aligned = case("c2", "m1", "v1.0");
    aligned.attributes = vec![
        TestCaseAttribute::new("priority", "high"),
        TestCaseAttribute::new("owner", ""),
    ];
    let drifted = case("c1", "m1", "v1.0").with_attribute("browser", "firefox");

    let mut initial = MockState {
        cases: vec![drifted, aligned],
        ..Default::default()
    };
    initial
        .schemas
        .insert("m1".to_string(), schema("m1", &["priority", "owner"]));
    let mock = MockBackend::start(initial).await;
    let client = client_for(&mock);

    let first = sync_module_attributes(&client, "m1").await.unwrap();
    assert!(first.is_clean());
    assert_eq!(first.succeeded, 1);
    assert_eq!(first.unchanged, 1);

    {
        let state = mock.state();
        assert_eq!(state.case_updates.len(), 1);
        let (id, request) = &state.case_updates[0];
        assert_eq!(id, "c1");
        let keys: Vec<&str> = request
            .attributes
            .as_ref()
            .unwrap()
            .iter()
            .map(|a| a.key.as_str())
            .collect();
        assert_eq!(keys, vec!["priority", "owner", "browser"]);
        assert_eq!(request.use_case.as_deref(), Some("Login"));
    }

    let second = sync_module_attributes(&client, "m1").await.unwrap();
    assert_eq!(second.succeeded, 0);
    assert_eq!(second.unchanged, 2);
    assert_eq!(mock.state().case_updates.len(), 1);
}

/// (3) One rejected update is reported while the others are saved.
#[actix_rt::test]
async fn test_submit_results_isolates_failures() {
    let mut locked = case(LOCKED_CASE_ID, "m1", "v1.0");
    locked.test_case_id = "TC-LOCKED".to_string();
    let mock = MockBackend::start(MockState {
        cases: vec![case("c1", "m1", "v1.0"), case("c2", "m1", "v1.0")],
        ..Default::default()
    })
    .await;
    let client = client_for(&mock);

    let edits = vec![
        CaseEdit::new(case("c1", "m1", "v1.0"), TestCaseResult::Pass),
        CaseEdit::new(locked, TestCaseResult::Fail).with_remarks("Crash on submit"),
        CaseEdit::new(case("c2", "m1", "v1.0"), TestCaseResult::Fail)
            .with_actual("Spinner never stops"),
    ];

    let report = submit_results(&client, &edits).await;

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].test_case_id, "TC-LOCKED");
    assert_eq!(report.failures[0].message, "Test case is locked");

    let state = mock.state();
    let c2 = state.cases.iter().find(|c| c.id == "c2").unwrap();
    assert_eq!(c2.result(), TestCaseResult::Fail);
    assert_eq!(c2.actual.as_deref(), Some("Spinner never stops"));
    let c1 = state.cases.iter().find(|c| c.id == "c1").unwrap();
    assert_eq!(c1.result(), TestCaseResult::Pass);
}

/// (4) A missing module id fails before any request.
#[actix_rt::test]
async fn test_sync_requires_module_id() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    assert!(sync_module_attributes(&client, "").await.is_err());
    assert_eq!(mock.request_count(), 0);
}
