//! Spreadsheet bridge: `.xlsx` export with rust_xlsxwriter, import with calamine.

pub mod export;
pub mod import;
pub mod mapping;

use std::collections::HashSet;

pub use export::{
    SuiteSheet, export_module_workbook, export_run_workbook, export_suite_workbook,
    module_export_file_name, run_export_file_name, select_cases, suite_export_file_name,
};
pub use import::{
    ImportReport, ImportRow, ModuleImport, RowError, SheetData, generate_test_case_id,
    import_rows, import_sheet_as_module, module_name_from_sheet, normalize_rows, read_workbook,
    read_workbook_file,
};
pub use mapping::{ColumnMapping, Field, ImportMode, auto_map_columns};

/// Appended to an exported attribute header that would clash with a fixed
/// column; stripped again when quick import turns the column into an
/// attribute.
pub const ATTRIBUTE_SUFFIX: &str = " (attribute)";

/// Longest worksheet name Excel accepts.
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Make a worksheet name Excel will accept.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME_CHARS).collect();
    if truncated.is_empty() {
        "Sheet".to_string()
    } else {
        truncated
    }
}

/// Hands out sanitized sheet names that are unique within one workbook.
///
/// Excel compares sheet names case-insensitively.
#[derive(Debug, Default)]
pub(crate) struct SheetNames {
    used: HashSet<String>,
}

impl SheetNames {
    pub(crate) fn next(&mut self, name: &str) -> String {
        let base = sanitize_sheet_name(name);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2;
        loop {
            let suffix = format!(" ({})", n);
            let room = MAX_SHEET_NAME_CHARS - suffix.chars().count();
            let stem: String = base.chars().take(room).collect();
            let candidate = format!("{}{}", stem.trim_end(), suffix);
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}
