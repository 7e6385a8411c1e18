//! Product summary: test case counts per module and version.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::api::ProductCatalog;
use crate::error::AppResult;
use crate::models::{ProductModule, TestCase, VersionMatrix};

/// Build the module/version count matrix.
///
/// Versions are collected from every case, orphans included, and listed in
/// descending order. Only cases belonging to one of `modules` are counted.
pub fn build_version_matrix(modules: Vec<ProductModule>, cases: &[TestCase]) -> VersionMatrix {
    let versions: BTreeSet<&str> = cases.iter().map(|c| c.version.as_str()).collect();
    let known: HashSet<&str> = modules.iter().map(|m| m.id.as_str()).collect();

    let mut matrix = VersionMatrix {
        versions: versions.into_iter().rev().map(str::to_string).collect(),
        ..Default::default()
    };

    let mut orphans = 0usize;
    for case in cases {
        if known.contains(case.module_id.as_str()) {
            matrix.increment(&case.module_id, &case.version);
        } else {
            orphans += 1;
        }
    }
    if orphans > 0 {
        debug!("Skipped {} test cases with unknown module ids", orphans);
    }

    matrix.modules = modules;
    matrix
}

/// Fetch a product's modules and cases concurrently and build its matrix.
pub async fn load_product_summary<C>(catalog: &C, product_id: &str) -> AppResult<VersionMatrix>
where
    C: ProductCatalog + ?Sized,
{
    let (modules, cases) = tokio::try_join!(
        catalog.product_modules(product_id),
        catalog.product_cases(product_id)
    )?;

    debug!(
        "Product {}: {} modules, {} test cases",
        product_id,
        modules.len(),
        cases.len()
    );

    Ok(build_version_matrix(modules, &cases))
}
