//! Test run endpoints: runs, suite assignment, status and results.

use super::ApiClient;
use super::client::{require, seg};
use crate::error::AppResult;
use crate::models::{
    AssignTestSuitesRequest, CreateTestRunRequest, IdResponse, TestRun, TestRunResult,
    TestRunStatus,
};

pub struct TestRunsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TestRunsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, product_id: &str) -> AppResult<Vec<TestRun>> {
        require(product_id, "Product ID")?;
        self.client
            .get_json(&format!("/products/{}/testruns", seg(product_id)))
            .await
    }

    pub async fn get(&self, product_id: &str, id: &str) -> AppResult<TestRun> {
        require(product_id, "Product ID")?;
        require(id, "Test run ID")?;
        self.client
            .get_json(&format!("/products/{}/testruns/{}", seg(product_id), seg(id)))
            .await
    }

    pub async fn create(
        &self,
        product_id: &str,
        request: &CreateTestRunRequest,
    ) -> AppResult<IdResponse> {
        require(product_id, "Product ID")?;
        self.client
            .post_json(&format!("/products/{}/testruns", seg(product_id)), request)
            .await
    }

    pub async fn delete(&self, product_id: &str, id: &str) -> AppResult<()> {
        require(product_id, "Product ID")?;
        require(id, "Test run ID")?;
        self.client
            .delete(&format!("/products/{}/testruns/{}", seg(product_id), seg(id)))
            .await
    }

    /// Store a run status. The body is the bare status string.
    pub async fn update_status(
        &self,
        product_id: &str,
        id: &str,
        status: TestRunStatus,
    ) -> AppResult<()> {
        require(product_id, "Product ID")?;
        require(id, "Test run ID")?;
        self.client
            .put_unit(
                &format!("/products/{}/testruns/{}/status", seg(product_id), seg(id)),
                &status,
            )
            .await
    }

    /// Ids of the suites assigned to a run.
    pub async fn assigned_suites(&self, run_id: &str) -> AppResult<Vec<String>> {
        require(run_id, "Test run ID")?;
        self.client
            .get_json(&format!("/testruns/{}/testsuites", seg(run_id)))
            .await
    }

    pub async fn assign_suites(&self, run_id: &str, test_suite_ids: Vec<String>) -> AppResult<()> {
        require(run_id, "Test run ID")?;
        let request = AssignTestSuitesRequest { test_suite_ids };
        self.client
            .post_unit(&format!("/testruns/{}/testsuites", seg(run_id)), &request)
            .await
    }

    pub async fn remove_suite(&self, run_id: &str, suite_id: &str) -> AppResult<()> {
        require(run_id, "Test run ID")?;
        require(suite_id, "Test suite ID")?;
        self.client
            .delete(&format!(
                "/testruns/{}/testsuites/{}",
                seg(run_id),
                seg(suite_id)
            ))
            .await
    }

    pub async fn results(&self, run_id: &str) -> AppResult<Vec<TestRunResult>> {
        require(run_id, "Test run ID")?;
        self.client
            .get_json(&format!("/testruns/{}/results", seg(run_id)))
            .await
    }

    pub async fn add_result(&self, run_id: &str, result: &TestRunResult) -> AppResult<()> {
        require(run_id, "Test run ID")?;
        self.client
            .post_unit(&format!("/testruns/{}/results", seg(run_id)), result)
            .await
    }
}
