//! Test case endpoints, including steps and attributes.

use std::collections::BTreeSet;

use super::ApiClient;
use super::client::{require, seg};
use crate::error::AppResult;
use crate::models::{
    CreateTestCaseRequest, IdResponse, TestCase, TestCaseAttribute, TestCaseAttributeRequest,
    TestCaseStep, UpdateTestCaseRequest,
};

pub struct TestCasesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TestCasesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Summary list of a module's cases.
    pub async fn list(&self, module_id: &str) -> AppResult<Vec<TestCase>> {
        require(module_id, "Module ID")?;
        self.client
            .get_json(&format!("/modules/{}/testcases", seg(module_id)))
            .await
    }

    /// A module's cases with steps and attributes resolved.
    pub async fn list_details(&self, module_id: &str) -> AppResult<Vec<TestCase>> {
        require(module_id, "Module ID")?;
        self.client
            .get_json(&format!("/modules/{}/testcases/detail", seg(module_id)))
            .await
    }

    /// Every case of every module of a product.
    pub async fn list_by_product(&self, product_id: &str) -> AppResult<Vec<TestCase>> {
        require(product_id, "Product ID")?;
        self.client
            .get_json(&format!("/products/{}/testcases", seg(product_id)))
            .await
    }

    pub async fn get(&self, module_id: &str, id: &str) -> AppResult<TestCase> {
        require(module_id, "Module ID")?;
        require(id, "Test case ID")?;
        self.client
            .get_json(&format!("/modules/{}/testcases/{}", seg(module_id), seg(id)))
            .await
    }

    pub async fn create(
        &self,
        module_id: &str,
        request: &CreateTestCaseRequest,
    ) -> AppResult<IdResponse> {
        require(module_id, "Module ID")?;
        self.client
            .post_json(&format!("/modules/{}/testcases", seg(module_id)), request)
            .await
    }

    pub async fn update(
        &self,
        module_id: &str,
        id: &str,
        request: &UpdateTestCaseRequest,
    ) -> AppResult<()> {
        require(module_id, "Module ID")?;
        require(id, "Test case ID")?;
        self.client
            .put_unit(
                &format!("/modules/{}/testcases/{}", seg(module_id), seg(id)),
                request,
            )
            .await
    }

    pub async fn delete(&self, module_id: &str, id: &str) -> AppResult<()> {
        require(module_id, "Module ID")?;
        require(id, "Test case ID")?;
        self.client
            .delete(&format!("/modules/{}/testcases/{}", seg(module_id), seg(id)))
            .await
    }

    pub async fn steps(&self, test_case_id: &str) -> AppResult<Vec<TestCaseStep>> {
        require(test_case_id, "Test case ID")?;
        self.client
            .get_json(&format!("/testcases/{}/steps", seg(test_case_id)))
            .await
    }

    pub async fn add_step(&self, test_case_id: &str, step: &TestCaseStep) -> AppResult<()> {
        require(test_case_id, "Test case ID")?;
        self.client
            .post_unit(&format!("/testcases/{}/steps", seg(test_case_id)), step)
            .await
    }

    pub async fn delete_step(&self, test_case_id: &str, step_id: u64) -> AppResult<()> {
        require(test_case_id, "Test case ID")?;
        self.client
            .delete(&format!("/testcases/{}/steps/{}", seg(test_case_id), step_id))
            .await
    }

    pub async fn attributes(&self, test_case_id: &str) -> AppResult<Vec<TestCaseAttribute>> {
        require(test_case_id, "Test case ID")?;
        self.client
            .get_json(&format!("/testcases/{}/attributes", seg(test_case_id)))
            .await
    }

    pub async fn add_attribute(
        &self,
        test_case_id: &str,
        request: &TestCaseAttributeRequest,
    ) -> AppResult<()> {
        require(test_case_id, "Test case ID")?;
        self.client
            .post_unit(
                &format!("/testcases/{}/attributes", seg(test_case_id)),
                request,
            )
            .await
    }

    pub async fn delete_attribute(&self, test_case_id: &str, key: &str) -> AppResult<()> {
        require(test_case_id, "Test case ID")?;
        require(key, "Attribute key")?;
        self.client
            .delete(&format!(
                "/testcases/{}/attributes/{}",
                seg(test_case_id),
                seg(key)
            ))
            .await
    }

    /// Distinct version labels used by a module's cases, sorted.
    pub async fn versions(&self, module_id: &str) -> AppResult<Vec<String>> {
        let cases = self.list(module_id).await?;
        let versions: BTreeSet<String> = cases.into_iter().map(|c| c.version).collect();
        Ok(versions.into_iter().collect())
    }
}
