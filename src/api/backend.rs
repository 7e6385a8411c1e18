//! Narrow backend capabilities consumed by the aggregation services.
//!
//! Services take these traits instead of [`ApiClient`] so they can run against
//! in-memory fakes. `ApiClient` implements all of them.

use super::ApiClient;
use crate::error::AppResult;
use crate::models::{
    CreateModuleRequest, CreateTestCaseRequest, ModuleAttribute, ProductModule, TestCase,
    TestCaseAttributeRequest, TestRunStatus, UpdateTestCaseRequest,
};

/// Reads the cases assigned to a suite.
#[async_trait::async_trait]
pub trait SuiteCaseSource: Send + Sync {
    async fn suite_cases(&self, suite_id: &str) -> AppResult<Vec<TestCase>>;
}

/// Stores a derived run status.
#[async_trait::async_trait]
pub trait RunStatusSink: Send + Sync {
    async fn store_run_status(
        &self,
        product_id: &str,
        run_id: &str,
        status: TestRunStatus,
    ) -> AppResult<()>;
}

/// Product level listings used by the summary matrix.
#[async_trait::async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product_modules(&self, product_id: &str) -> AppResult<Vec<ProductModule>>;

    async fn product_cases(&self, product_id: &str) -> AppResult<Vec<TestCase>>;
}

/// Module scoped reads plus per-case updates.
#[async_trait::async_trait]
pub trait ModuleCaseStore: Send + Sync {
    async fn module_schema(&self, module_id: &str) -> AppResult<Vec<ModuleAttribute>>;

    async fn module_cases(&self, module_id: &str) -> AppResult<Vec<TestCase>>;

    async fn update_case(
        &self,
        module_id: &str,
        id: &str,
        request: &UpdateTestCaseRequest,
    ) -> AppResult<()>;
}

/// Creates modules, cases and case attributes during imports.
#[async_trait::async_trait]
pub trait TestCaseCreator: Send + Sync {
    /// Returns the id of the new module.
    async fn create_module(&self, product_id: &str, request: &CreateModuleRequest)
    -> AppResult<String>;

    /// Returns the id of the new case.
    async fn create_case(&self, module_id: &str, request: &CreateTestCaseRequest)
    -> AppResult<String>;

    async fn add_case_attribute(
        &self,
        case_id: &str,
        request: &TestCaseAttributeRequest,
    ) -> AppResult<()>;
}

#[async_trait::async_trait]
impl SuiteCaseSource for ApiClient {
    async fn suite_cases(&self, suite_id: &str) -> AppResult<Vec<TestCase>> {
        self.test_suites().test_cases(suite_id).await
    }
}

#[async_trait::async_trait]
impl RunStatusSink for ApiClient {
    async fn store_run_status(
        &self,
        product_id: &str,
        run_id: &str,
        status: TestRunStatus,
    ) -> AppResult<()> {
        self.test_runs()
            .update_status(product_id, run_id, status)
            .await
    }
}

#[async_trait::async_trait]
impl ProductCatalog for ApiClient {
    async fn product_modules(&self, product_id: &str) -> AppResult<Vec<ProductModule>> {
        self.modules().list(product_id).await
    }

    async fn product_cases(&self, product_id: &str) -> AppResult<Vec<TestCase>> {
        self.test_cases().list_by_product(product_id).await
    }
}

#[async_trait::async_trait]
impl ModuleCaseStore for ApiClient {
    async fn module_schema(&self, module_id: &str) -> AppResult<Vec<ModuleAttribute>> {
        self.modules().attributes(module_id).await
    }

    async fn module_cases(&self, module_id: &str) -> AppResult<Vec<TestCase>> {
        self.test_cases().list_details(module_id).await
    }

    async fn update_case(
        &self,
        module_id: &str,
        id: &str,
        request: &UpdateTestCaseRequest,
    ) -> AppResult<()> {
        self.test_cases().update(module_id, id, request).await
    }
}

#[async_trait::async_trait]
impl TestCaseCreator for ApiClient {
    async fn create_module(
        &self,
        product_id: &str,
        request: &CreateModuleRequest,
    ) -> AppResult<String> {
        Ok(self.modules().create(product_id, request).await?.id)
    }

    async fn create_case(
        &self,
        module_id: &str,
        request: &CreateTestCaseRequest,
    ) -> AppResult<String> {
        Ok(self.test_cases().create(module_id, request).await?.id)
    }

    async fn add_case_attribute(
        &self,
        case_id: &str,
        request: &TestCaseAttributeRequest,
    ) -> AppResult<()> {
        self.test_cases().add_attribute(case_id, request).await
    }
}
