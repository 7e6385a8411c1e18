//! Run progress: per-suite tallies, run totals and the derived run status.

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{RunStatusSink, SuiteCaseSource};
use crate::config::RunStatusPolicy;
use crate::error::{AppError, AppResult};
use crate::models::{
    CaseTally, RunMetadata, RunStats, SuiteStats, TestCase, TestCaseResult, TestRun,
    TestRunStatus,
};

/// Result filter offered by the results view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultFilter {
    #[default]
    All,
    Pass,
    Fail,
    Pending,
    Blocked,
}

impl ResultFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Some(Self::All),
            other => TestCaseResult::parse(other).map(|result| match result {
                TestCaseResult::Pass => Self::Pass,
                TestCaseResult::Fail => Self::Fail,
                TestCaseResult::Pending => Self::Pending,
                TestCaseResult::Blocked => Self::Blocked,
            }),
        }
    }

    pub fn matches(&self, case: &TestCase) -> bool {
        match self {
            Self::All => true,
            Self::Pass => case.result() == TestCaseResult::Pass,
            Self::Fail => case.result() == TestCaseResult::Fail,
            Self::Pending => case.result() == TestCaseResult::Pending,
            Self::Blocked => case.result() == TestCaseResult::Blocked,
        }
    }

    pub fn apply<'a>(&self, cases: &'a [TestCase]) -> Vec<&'a TestCase> {
        cases.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Pass/fail/pending counts for an arbitrary case list.
pub fn tally_cases(cases: &[TestCase]) -> CaseTally {
    CaseTally::from_cases(cases)
}

/// What happened to the derived status after the stats were computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "camelCase")]
pub enum StatusUpdate {
    /// Read-only policy; nothing was written
    Skipped,
    Stored(TestRunStatus),
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProgress {
    pub stats: RunStats,
    pub status_update: StatusUpdate,
}

/// Cases of one suite, in the order the backend returned them.
#[derive(Debug, Clone)]
pub struct SuiteCases {
    pub suite_id: String,
    pub suite_name: String,
    pub cases: Vec<TestCase>,
}

/// Fetch the cases of every suite of `run` concurrently.
///
/// Suite order follows `run.test_suites`. Any failed fetch fails the whole
/// call so no status is ever derived from partial data.
pub async fn fetch_suite_cases<S>(source: &S, run: &TestRun) -> AppResult<Vec<SuiteCases>>
where
    S: SuiteCaseSource + ?Sized,
{
    if run.id.trim().is_empty() {
        return Err(AppError::InvalidInput("Test run ID is required".to_string()));
    }

    let fetches = run
        .test_suites
        .iter()
        .map(|suite| source.suite_cases(&suite.id));
    let results = join_all(fetches).await;

    let mut suites = Vec::with_capacity(run.test_suites.len());
    for (suite, result) in run.test_suites.iter().zip(results) {
        let cases = result.map_err(|e| {
            warn!("Failed to load cases for suite {} of run {}: {}", suite.id, run.id, e);
            e
        })?;
        suites.push(SuiteCases {
            suite_id: suite.id.clone(),
            suite_name: suite.name.clone(),
            cases,
        });
    }
    Ok(suites)
}

/// Aggregate already fetched suite cases into run stats.
pub fn stats_from_suite_cases(run: &TestRun, suites: &[SuiteCases]) -> RunStats {
    let suite_stats = suites
        .iter()
        .map(|suite| {
            let tally = tally_cases(&suite.cases);
            debug!(
                "Suite {} ({}): {} cases, {} passed, {} failed",
                suite.suite_id, suite.suite_name, tally.total, tally.passed, tally.failed
            );
            SuiteStats::new(suite.suite_id.clone(), suite.suite_name.clone(), tally)
        })
        .collect();

    let metadata = RunMetadata {
        description: run.description.clone().unwrap_or_default(),
        created_by: run.created_by.clone().unwrap_or_default(),
        created_at: run.created_at,
        updated_at: run.updated_at,
        stored_status: run.status,
    };

    RunStats::from_suites(run.id.clone(), run.name.clone(), suite_stats, metadata)
}

/// Fetch every suite of `run` and aggregate per-suite and run totals.
pub async fn compute_run_stats<S>(source: &S, run: &TestRun) -> AppResult<RunStats>
where
    S: SuiteCaseSource + ?Sized,
{
    let suites = fetch_suite_cases(source, run).await?;
    Ok(stats_from_suite_cases(run, &suites))
}

/// Compute run stats and, under [`RunStatusPolicy::PushDerived`], store the
/// derived status with exactly one write.
///
/// A failed write is logged and reported on the outcome; the stats are
/// still returned.
pub async fn refresh_run_progress<S, W>(
    source: &S,
    sink: &W,
    run: &TestRun,
    policy: RunStatusPolicy,
) -> AppResult<RunProgress>
where
    S: SuiteCaseSource + ?Sized,
    W: RunStatusSink + ?Sized,
{
    let stats = compute_run_stats(source, run).await?;

    let status_update = match policy {
        RunStatusPolicy::ReadOnly => StatusUpdate::Skipped,
        RunStatusPolicy::PushDerived => {
            match sink
                .store_run_status(&run.product_id, &run.id, stats.status)
                .await
            {
                Ok(()) => {
                    info!("Stored status '{}' for run {}", stats.status, run.id);
                    StatusUpdate::Stored(stats.status)
                }
                Err(e) => {
                    warn!("Failed to store status for run {}: {}", run.id, e);
                    StatusUpdate::Failed(e.user_message())
                }
            }
        }
    };

    Ok(RunProgress {
        stats,
        status_update,
    })
}
