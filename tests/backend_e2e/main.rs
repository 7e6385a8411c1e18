//! Backend E2E test suite.
//!
//! Drives the resource clients and services against an in-process mock of
//! the test management REST backend. No external services are needed.
//!
//! Run with: cargo test --test backend_e2e

mod fixtures;

mod test_resources;
mod test_run_progress;
mod test_services;
mod test_spreadsheet;
