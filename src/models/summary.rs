//! Module/version count matrix for product summaries.

use std::collections::HashMap;

use serde::Serialize;

use super::ProductModule;

/// Which versions an aggregation covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    All,
    Only(String),
}

impl VersionSelector {
    /// `all` (any case) selects every version, anything else a single label.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(s.trim().to_string())
        }
    }

    pub fn matches(&self, version: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(v) => v == version,
        }
    }
}

/// Sparse count of test cases per module and version.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMatrix {
    pub modules: Vec<ProductModule>,
    /// Distinct version labels, descending
    pub versions: Vec<String>,
    #[serde(skip)]
    pub(crate) matrix: HashMap<(String, String), u32>,
    pub version_totals: HashMap<String, u32>,
}

impl VersionMatrix {
    /// Number of cases for a module/version pair; 0 for unseen pairs.
    pub fn count(&self, module_id: &str, version: &str) -> u32 {
        self.matrix
            .get(&(module_id.to_string(), version.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn version_total(&self, version: &str) -> u32 {
        self.version_totals.get(version).copied().unwrap_or(0)
    }

    pub fn module_total(&self, module_id: &str) -> u32 {
        self.versions
            .iter()
            .map(|v| self.count(module_id, v))
            .sum()
    }

    pub fn grand_total(&self) -> u32 {
        self.version_totals.values().sum()
    }

    pub(crate) fn increment(&mut self, module_id: &str, version: &str) {
        *self
            .matrix
            .entry((module_id.to_string(), version.to_string()))
            .or_insert(0) += 1;
        *self.version_totals.entry(version.to_string()).or_insert(0) += 1;
    }
}
