//! Test suite model: a reusable collection of test case references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TestCase;

/// Test suite belonging to a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuite {
    pub id: String,
    #[serde(default)]
    pub product_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Resolved cases, present on the suite-with-cases endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<Vec<TestCase>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestSuiteRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTestCasesRequest {
    pub test_case_ids: Vec<String>,
}

/// The suite test case endpoint answers either with a bare case list or
/// with the suite wrapping its cases; both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SuiteCasesResponse {
    Cases(Vec<TestCase>),
    Suite(TestSuite),
}

impl SuiteCasesResponse {
    pub fn into_cases(self) -> Vec<TestCase> {
        match self {
            Self::Cases(cases) => cases,
            Self::Suite(suite) => suite.test_cases.unwrap_or_default(),
        }
    }
}
