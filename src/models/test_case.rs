//! Test case model with steps, attributes and execution result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Execution result recorded on a test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestCaseResult {
    #[default]
    #[serde(alias = "pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "pass", alias = "PASS", alias = "Passed")]
    Pass,
    #[serde(alias = "fail", alias = "FAIL", alias = "Failed")]
    Fail,
    #[serde(alias = "blocked", alias = "BLOCKED")]
    Blocked,
}

impl TestCaseResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Blocked => "Blocked",
        }
    }

    /// Parse from a user or spreadsheet supplied string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "" => Some(Self::Pending),
            "pass" | "passed" => Some(Self::Pass),
            "fail" | "failed" => Some(Self::Fail),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Pass and Fail are terminal; everything else still needs execution.
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Pass | Self::Fail)
    }
}

impl std::fmt::Display for TestCaseResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a test case is executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestType {
    #[default]
    #[serde(alias = "manual")]
    Manual,
    #[serde(alias = "automation", alias = "Automated")]
    Automation,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Automation => "Automation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Some(Self::Manual),
            "automation" | "automated" => Some(Self::Automation),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ordered step of a manual test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseStep {
    /// Owning test case id (empty until the case exists)
    #[serde(default)]
    pub test_case_id: String,
    /// Instruction text
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub expected_result: String,
}

impl TestCaseStep {
    pub fn new(steps: impl Into<String>, expected_result: impl Into<String>) -> Self {
        TestCaseStep {
            test_case_id: String::new(),
            steps: steps.into(),
            expected_result: expected_result.into(),
        }
    }
}

/// Key-value classifier attached to a test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseAttribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl TestCaseAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        TestCaseAttribute {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Full test case as returned by detail and suite endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    #[serde(default)]
    pub module_id: String,
    #[serde(default)]
    pub version: String,
    /// Business code such as `TC101`
    #[serde(default)]
    pub test_case_id: String,
    #[serde(default)]
    pub use_case: String,
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub test_type: TestType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_tool: Option<String>,
    #[serde(default)]
    pub steps: Vec<TestCaseStep>,
    #[serde(default)]
    pub result: Option<TestCaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default)]
    pub attributes: Vec<TestCaseAttribute>,
    #[serde(default)]
    pub uploads: Vec<String>,
    #[serde(default)]
    pub test_suite_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TestCase {
    /// Minimal case used when assembling fixtures and import previews.
    pub fn new(
        id: impl Into<String>,
        module_id: impl Into<String>,
        version: impl Into<String>,
        test_case_id: impl Into<String>,
    ) -> Self {
        TestCase {
            id: id.into(),
            module_id: module_id.into(),
            version: version.into(),
            test_case_id: test_case_id.into(),
            use_case: String::new(),
            scenario: String::new(),
            test_type: TestType::Manual,
            test_tool: None,
            steps: Vec::new(),
            result: None,
            actual: None,
            remarks: None,
            attributes: Vec::new(),
            uploads: Vec::new(),
            test_suite_ids: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_result(mut self, result: TestCaseResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push(TestCaseAttribute::new(key, value));
        self
    }

    /// Recorded result, `Pending` when none has been recorded.
    pub fn result(&self) -> TestCaseResult {
        self.result.unwrap_or_default()
    }

    /// Value of an attribute, empty when the case does not carry it.
    pub fn attribute_value(&self, key: &str) -> &str {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestCaseRequest {
    pub module_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub test_case_id: String,
    pub use_case: String,
    pub scenario: String,
    pub test_type: TestType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_tool: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub steps: Vec<TestCaseStep>,
}

/// Partial update; absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestCaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_type: Option<TestType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TestCaseResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<TestCaseStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<TestCaseAttribute>>,
}

impl UpdateTestCaseRequest {
    /// Update that re-sends the descriptive fields of `case` unchanged.
    pub fn preserving(case: &TestCase) -> Self {
        UpdateTestCaseRequest {
            use_case: Some(case.use_case.clone()),
            scenario: Some(case.scenario.clone()),
            test_type: Some(case.test_type),
            test_tool: case.test_tool.clone(),
            result: Some(case.result()),
            actual: case.actual.clone(),
            remarks: case.remarks.clone(),
            steps: None,
            attributes: Some(case.attributes.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseAttributeRequest {
    pub key: String,
    pub value: String,
}

impl From<TestCaseAttribute> for TestCaseAttributeRequest {
    fn from(attr: TestCaseAttribute) -> Self {
        TestCaseAttributeRequest {
            key: attr.key,
            value: attr.value,
        }
    }
}
