//! Aggregation services built on the resource clients.

pub mod attribute_sync;
pub mod batch;
pub mod results;
pub mod run_progress;
pub mod spreadsheet;
pub mod summary;

pub use attribute_sync::{merge_attributes, sync_module_attributes};
pub use batch::{BatchFailure, BatchReport};
pub use results::{CaseEdit, submit_results};
pub use run_progress::{
    ResultFilter, RunProgress, StatusUpdate, SuiteCases, compute_run_stats, fetch_suite_cases,
    refresh_run_progress, stats_from_suite_cases, tally_cases,
};
pub use summary::{build_version_matrix, load_product_summary};
