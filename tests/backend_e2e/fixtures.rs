//! Shared fixtures for backend E2E tests.

use tcm_lib::api::ApiClient;
use tcm_lib::config::Config;
use tcm_lib::models::{
    ModuleAttribute, Product, ProductModule, TestCase, TestCaseResult, TestRun, TestRunStatus,
    TestSuiteRef,
};

use super::mock_backend::MockBackend;

pub const PRODUCT_ID: &str = "p1";

/// Client with default development settings pointed at the mock.
pub fn client_for(mock: &MockBackend) -> ApiClient {
    ApiClient::new(&Config::for_api_url(&mock.base_url)).expect("failed to build client")
}

pub fn product(id: &str, name: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        created_at: None,
        is_active: true,
        version_count: None,
        module_count: None,
    }
}

pub fn module(id: &str, name: &str) -> ProductModule {
    ProductModule {
        id: id.to_string(),
        product_id: PRODUCT_ID.to_string(),
        name: name.to_string(),
        description: None,
        version: "v1.0".to_string(),
        is_active: true,
    }
}

pub fn schema(module_id: &str, keys: &[&str]) -> Vec<ModuleAttribute> {
    keys.iter()
        .map(|key| {
            let mut attr = ModuleAttribute::with_key(*key);
            attr.module_id = module_id.to_string();
            attr
        })
        .collect()
}

pub fn case(id: &str, module_id: &str, version: &str) -> TestCase {
    let mut case = TestCase::new(id, module_id, version, format!("TC-{}", id));
    case.use_case = "Login".to_string();
    case.scenario = format!("Scenario {}", id);
    case
}

pub fn case_with(id: &str, result: TestCaseResult) -> TestCase {
    case(id, "m1", "v1.0").with_result(result)
}

pub fn run(id: &str, suite_ids: &[&str]) -> TestRun {
    TestRun {
        id: id.to_string(),
        product_id: PRODUCT_ID.to_string(),
        name: "Sprint 12".to_string(),
        description: None,
        status: TestRunStatus::NotStarted,
        created_by: Some("qa-lead".to_string()),
        created_at: None,
        updated_at: None,
        test_suites: suite_ids
            .iter()
            .map(|id| TestSuiteRef {
                id: id.to_string(),
                name: format!("Suite {}", id),
            })
            .collect(),
    }
}
