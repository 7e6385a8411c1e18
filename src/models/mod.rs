//! Domain models for the test case console.

pub mod product;
pub mod product_module;
pub mod run_stats;
pub mod summary;
pub mod test_case;
pub mod test_run;
pub mod test_suite;
pub mod upload;

// Re-export commonly used types
pub use product::{
    CreateProductRequest, IdResponse, Product, ProductVersion, ProductVersionRequest,
    UpdateProductRequest,
};
pub use product_module::{
    CreateModuleRequest, ModuleAttribute, ModuleAttributeRequest, ProductModule,
    UpdateModuleRequest,
};
pub use run_stats::{CaseTally, RunMetadata, RunStats, SuiteStats, completion_percent};
pub use summary::{VersionMatrix, VersionSelector};
pub use test_case::{
    CreateTestCaseRequest, TestCase, TestCaseAttribute, TestCaseAttributeRequest,
    TestCaseResult, TestCaseStep, TestType, UpdateTestCaseRequest,
};
pub use test_run::{
    AssignTestSuitesRequest, CreateTestRunRequest, TestRun, TestRunResult, TestRunStatus,
    TestSuiteRef,
};
pub use test_suite::{AssignTestCasesRequest, CreateTestSuiteRequest, SuiteCasesResponse, TestSuite};
pub use upload::UploadResponse;
