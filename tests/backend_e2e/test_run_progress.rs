//! E2E tests: run progress aggregation and status write-back.

use tcm_lib::config::RunStatusPolicy;
use tcm_lib::models::{TestCaseResult, TestRunStatus};
use tcm_lib::services::{StatusUpdate, compute_run_stats, refresh_run_progress};

use super::fixtures::*;
use super::mock_backend::{BROKEN_SUITE_ID, MockBackend, MockState};

fn seeded_state() -> MockState {
    let mut state = MockState {
        runs: vec![run("r1", &["s1", "s2"])],
        ..Default::default()
    };
    state.suites.insert(
        "s1".to_string(),
        vec![
            case_with("c1", TestCaseResult::Pass),
            case_with("c2", TestCaseResult::Fail),
        ],
    );
    state
        .suites
        .insert("s2".to_string(), vec![case("c3", "m1", "v1.0")]);
    state
}

/// (1) Two suites, one pass, one fail, one pending → 33% and a single
/// "In Progress" write.
#[actix_rt::test]
async fn test_refresh_aggregates_and_stores_status_once() {
    let mock = MockBackend::start(seeded_state()).await;
    let client = client_for(&mock);
    let run = client.test_runs().get(PRODUCT_ID, "r1").await.unwrap();

    let progress = refresh_run_progress(&client, &client, &run, RunStatusPolicy::PushDerived)
        .await
        .unwrap();

    let stats = &progress.stats;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.passed, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.completion, 33);
    assert_eq!(stats.status, TestRunStatus::InProgress);
    assert_eq!(stats.suites.len(), 2);
    assert_eq!(stats.suites[0].suite_id, "s1");
    assert_eq!(stats.suites[0].completion, 50);
    assert_eq!(stats.suites[1].pending, 1);
    assert_eq!(
        progress.status_update,
        StatusUpdate::Stored(TestRunStatus::InProgress)
    );

    let state = mock.state();
    assert_eq!(state.status_writes.len(), 1);
    assert_eq!(state.status_writes[0].2, "\"In Progress\"");
}

/// (2) Read-only policy computes stats without writing.
#[actix_rt::test]
async fn test_read_only_policy_never_writes() {
    let mock = MockBackend::start(seeded_state()).await;
    let client = client_for(&mock);
    let run = client.test_runs().get(PRODUCT_ID, "r1").await.unwrap();

    let progress = refresh_run_progress(&client, &client, &run, RunStatusPolicy::ReadOnly)
        .await
        .unwrap();

    assert_eq!(progress.stats.total, 3);
    assert_eq!(progress.status_update, StatusUpdate::Skipped);
    assert!(mock.state().status_writes.is_empty());
}

/// (3) One failing suite fails the whole computation and nothing is written.
#[actix_rt::test]
async fn test_failing_suite_fails_refresh() {
    let mock = MockBackend::start(seeded_state()).await;
    let client = client_for(&mock);
    let run = run("r1", &["s1", BROKEN_SUITE_ID]);

    let err = refresh_run_progress(&client, &client, &run, RunStatusPolicy::PushDerived)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(mock.state().status_writes.is_empty());
}

/// (4) Every case executed → Completed.
#[actix_rt::test]
async fn test_all_executed_run_is_completed() {
    let mut initial = MockState::default();
    initial.suites.insert(
        "s1".to_string(),
        vec![
            case_with("c1", TestCaseResult::Pass),
            case_with("c2", TestCaseResult::Fail),
        ],
    );
    let mock = MockBackend::start(initial).await;
    let client = client_for(&mock);

    let stats = compute_run_stats(&client, &run("r1", &["s1"]))
        .await
        .unwrap();

    assert_eq!(stats.status, TestRunStatus::Completed);
    assert_eq!(stats.completion, 50);
    assert!(mock.state().status_writes.is_empty());
}

/// (5) A run without suites is Not Started with zero completion.
#[actix_rt::test]
async fn test_run_without_suites() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    let progress = refresh_run_progress(
        &client,
        &client,
        &run("r2", &[]),
        RunStatusPolicy::PushDerived,
    )
    .await
    .unwrap();

    assert_eq!(progress.stats.total, 0);
    assert_eq!(progress.stats.completion, 0);
    assert_eq!(progress.stats.status, TestRunStatus::NotStarted);
    assert_eq!(mock.state().status_writes[0].2, "\"Not Started\"");
}
