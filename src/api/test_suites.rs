//! Test suite endpoints and case assignment.

use super::ApiClient;
use super::client::{require, seg};
use crate::error::AppResult;
use crate::models::{
    AssignTestCasesRequest, CreateTestSuiteRequest, IdResponse, SuiteCasesResponse, TestCase,
    TestSuite,
};

pub struct TestSuitesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TestSuitesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, product_id: &str) -> AppResult<Vec<TestSuite>> {
        require(product_id, "Product ID")?;
        self.client
            .get_json(&format!("/products/{}/testsuites", seg(product_id)))
            .await
    }

    pub async fn get(&self, product_id: &str, id: &str) -> AppResult<TestSuite> {
        require(product_id, "Product ID")?;
        require(id, "Test suite ID")?;
        self.client
            .get_json(&format!(
                "/products/{}/testsuites/{}",
                seg(product_id),
                seg(id)
            ))
            .await
    }

    pub async fn create(
        &self,
        product_id: &str,
        request: &CreateTestSuiteRequest,
    ) -> AppResult<IdResponse> {
        require(product_id, "Product ID")?;
        self.client
            .post_json(&format!("/products/{}/testsuites", seg(product_id)), request)
            .await
    }

    pub async fn update(
        &self,
        product_id: &str,
        id: &str,
        request: &CreateTestSuiteRequest,
    ) -> AppResult<()> {
        require(product_id, "Product ID")?;
        require(id, "Test suite ID")?;
        self.client
            .put_unit(
                &format!("/products/{}/testsuites/{}", seg(product_id), seg(id)),
                request,
            )
            .await
    }

    pub async fn delete(&self, product_id: &str, id: &str) -> AppResult<()> {
        require(product_id, "Product ID")?;
        require(id, "Test suite ID")?;
        self.client
            .delete(&format!(
                "/products/{}/testsuites/{}",
                seg(product_id),
                seg(id)
            ))
            .await
    }

    /// Cases assigned to a suite, with their current results.
    pub async fn test_cases(&self, suite_id: &str) -> AppResult<Vec<TestCase>> {
        require(suite_id, "Test suite ID")?;
        let response: SuiteCasesResponse = self
            .client
            .get_json(&format!("/testsuites/{}/testcases", seg(suite_id)))
            .await?;
        Ok(response.into_cases())
    }

    pub async fn assign_test_cases(&self, suite_id: &str, test_case_ids: Vec<String>) -> AppResult<()> {
        require(suite_id, "Test suite ID")?;
        let request = AssignTestCasesRequest { test_case_ids };
        self.client
            .post_unit(&format!("/testsuites/{}/testcases", seg(suite_id)), &request)
            .await
    }

    pub async fn remove_test_case(&self, suite_id: &str, test_case_id: &str) -> AppResult<()> {
        require(suite_id, "Test suite ID")?;
        require(test_case_id, "Test case ID")?;
        self.client
            .delete(&format!(
                "/testsuites/{}/testcases/{}",
                seg(suite_id),
                seg(test_case_id)
            ))
            .await
    }
}
