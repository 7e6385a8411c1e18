//! REST resource clients for the test management backend.

pub mod backend;
pub mod client;
pub mod modules;
pub mod products;
pub mod test_cases;
pub mod test_runs;
pub mod test_suites;
pub mod uploads;

pub use backend::{ModuleCaseStore, ProductCatalog, RunStatusSink, SuiteCaseSource, TestCaseCreator};
pub use client::ApiClient;
pub use modules::ModulesApi;
pub use products::ProductsApi;
pub use test_cases::TestCasesApi;
pub use test_runs::TestRunsApi;
pub use test_suites::TestSuitesApi;
pub use uploads::UploadsApi;
