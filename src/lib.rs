//! Test case console library.
//!
//! Resource clients for the test management REST backend, the aggregation
//! services built on them (run progress, product summary, attribute sync,
//! result submission) and the spreadsheet import/export bridge.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
