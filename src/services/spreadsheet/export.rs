//! Workbook exports for modules, runs and suites.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::info;

use super::{ATTRIBUTE_SUFFIX, SheetNames};
use crate::error::{AppError, AppResult};
use crate::models::{RunStats, TestCase, TestCaseResult, VersionSelector};
use crate::services::run_progress::SuiteCases;

const MODULE_HEADERS: [&str; 7] = [
    "Test Case ID",
    "Use Case",
    "Scenario",
    "Steps",
    "Result",
    "Actual",
    "Remarks",
];

const RESULT_HEADERS: [&str; 9] = [
    "Sl.No",
    "Test Case ID",
    "Use Case",
    "Scenario",
    "Steps",
    "Expected",
    "Result",
    "Actual",
    "Remarks",
];

const COLUMN_WIDTH: f64 = 24.0;

/// Borrowed suite content for a single-suite export.
pub struct SuiteSheet<'a> {
    pub name: &'a str,
    pub cases: &'a [TestCase],
}

/// Cases the selector keeps, in input order.
pub fn select_cases<'a>(cases: &'a [TestCase], selector: &VersionSelector) -> Vec<&'a TestCase> {
    cases.iter().filter(|c| selector.matches(&c.version)).collect()
}

/// Export a module's cases, one sheet per version in descending order.
///
/// Columns are the fixed module headers followed by every attribute key of
/// the sheet's cases in first-seen order.
pub fn export_module_workbook(
    cases: &[TestCase],
    selector: &VersionSelector,
) -> AppResult<Vec<u8>> {
    let selected = select_cases(cases, selector);
    if selected.is_empty() {
        return Err(AppError::InvalidInput(
            "No test cases to export".to_string(),
        ));
    }

    let versions: BTreeSet<&str> = selected.iter().map(|c| c.version.as_str()).collect();
    let mut workbook = Workbook::new();
    let mut names = SheetNames::default();
    let header = Format::new().set_bold();

    for version in versions.into_iter().rev() {
        let version_cases: Vec<&TestCase> = selected
            .iter()
            .copied()
            .filter(|c| c.version == version)
            .collect();
        let attribute_keys = attribute_keys(&version_cases);
        let attribute_headers = attribute_headers(&attribute_keys);

        let sheet = workbook.add_worksheet();
        sheet.set_name(names.next(version))?;

        let headers = MODULE_HEADERS
            .iter()
            .copied()
            .chain(attribute_headers.iter().map(String::as_str));
        write_header(sheet, headers, &header)?;

        for (idx, case) in version_cases.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_string(row, 0, &case.test_case_id)?;
            sheet.write_string(row, 1, &case.use_case)?;
            sheet.write_string(row, 2, &case.scenario)?;
            sheet.write_string(row, 3, numbered_steps(case))?;
            sheet.write_string(row, 4, case.result().as_str())?;
            sheet.write_string(row, 5, case.actual.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 6, case.remarks.as_deref().unwrap_or(""))?;
            for (offset, key) in attribute_keys.iter().enumerate() {
                let col = (MODULE_HEADERS.len() + offset) as u16;
                sheet.write_string(row, col, case.attribute_value(key))?;
            }
        }
    }

    info!("Exported {} test cases", selected.len());
    Ok(workbook.save_to_buffer()?)
}

/// Export a run: a `Summary` sheet followed by one results sheet per suite.
pub fn export_run_workbook(stats: &RunStats, suites: &[SuiteCases]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let mut names = SheetNames::default();
    let header = Format::new().set_bold();

    let summary = workbook.add_worksheet();
    summary.set_name(names.next("Summary"))?;
    write_summary(summary, stats, &header)?;

    for suite in suites {
        let sheet = workbook.add_worksheet();
        sheet.set_name(names.next(&suite.suite_name))?;
        write_results(sheet, &suite.cases, &header)?;
    }

    info!(
        "Exported run {} with {} suite sheets",
        stats.run_id,
        suites.len()
    );
    Ok(workbook.save_to_buffer()?)
}

/// Export one suite's results on a single sheet named after the suite.
pub fn export_suite_workbook(suite: SuiteSheet<'_>) -> AppResult<Vec<u8>> {
    if suite.cases.is_empty() {
        return Err(AppError::InvalidInput(
            "No test cases found in this suite".to_string(),
        ));
    }

    let mut workbook = Workbook::new();
    let mut names = SheetNames::default();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(names.next(suite.name))?;
    write_results(sheet, suite.cases, &header)?;

    Ok(workbook.save_to_buffer()?)
}

pub fn module_export_file_name(module_name: &str) -> String {
    let stem: Vec<&str> = module_name.split_whitespace().collect();
    format!("{}_Test_Cases.xlsx", stem.join("_"))
}

pub fn run_export_file_name(run_name: &str) -> String {
    format!("{}_All_Test_Suites.xlsx", run_name.trim())
}

pub fn suite_export_file_name(suite_name: &str) -> String {
    format!("{}_Test_Cases.xlsx", suite_name.trim())
}

fn write_header<'a>(
    sheet: &mut Worksheet,
    headers: impl Iterator<Item = &'a str>,
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, title) in headers.enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, title, format)?;
        sheet.set_column_width(col, COLUMN_WIDTH)?;
    }
    Ok(())
}

fn write_summary(sheet: &mut Worksheet, stats: &RunStats, label: &Format) -> Result<(), XlsxError> {
    let meta = &stats.metadata;
    let text_rows = [
        ("Test Run Name", stats.run_name.clone()),
        ("Description", meta.description.clone()),
        ("Created By", meta.created_by.clone()),
        ("Created At", timestamp(meta.created_at)),
        ("Updated At", timestamp(meta.updated_at)),
        ("Status", stats.status.to_string()),
    ];
    for (row, (name, value)) in text_rows.iter().enumerate() {
        sheet.write_string_with_format(row as u32, 0, *name, label)?;
        sheet.write_string(row as u32, 1, value)?;
    }

    // one blank row between metadata and counts
    let count_rows = [
        ("Total Test Cases", stats.total),
        ("Passed", stats.passed),
        ("Failed", stats.failed),
        ("Pending", stats.pending),
        ("Completion %", stats.completion),
    ];
    let first = text_rows.len() as u32 + 1;
    for (offset, (name, value)) in count_rows.iter().enumerate() {
        let row = first + offset as u32;
        sheet.write_string_with_format(row, 0, *name, label)?;
        sheet.write_number(row, 1, *value)?;
    }

    sheet.set_column_width(0, COLUMN_WIDTH)?;
    sheet.set_column_width(1, COLUMN_WIDTH * 2.0)?;
    Ok(())
}

fn write_results(sheet: &mut Worksheet, cases: &[TestCase], header: &Format) -> Result<(), XlsxError> {
    write_header(sheet, RESULT_HEADERS.iter().copied(), header)?;

    for (idx, case) in cases.iter().enumerate() {
        let row = idx as u32 + 1;
        let result = case.result.unwrap_or(TestCaseResult::Pending);
        sheet.write_number(row, 0, row)?;
        sheet.write_string(row, 1, &case.test_case_id)?;
        sheet.write_string(row, 2, &case.use_case)?;
        sheet.write_string(row, 3, &case.scenario)?;
        sheet.write_string(row, 4, numbered_steps(case))?;
        sheet.write_string(row, 5, numbered_expected(case))?;
        sheet.write_string(row, 6, result.as_str())?;
        sheet.write_string(row, 7, case.actual.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 8, case.remarks.as_deref().unwrap_or(""))?;
    }
    Ok(())
}

/// Distinct attribute keys in first-seen order.
fn attribute_keys(cases: &[&TestCase]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for attr in cases.iter().flat_map(|c| c.attributes.iter()) {
        if !keys.contains(&attr.key) {
            keys.push(attr.key.clone());
        }
    }
    keys
}

/// Header text for each attribute column.
///
/// Keys equal to a fixed column (ignoring case) or to an earlier header get
/// [`ATTRIBUTE_SUFFIX`] appended until unique, so every column reads back.
fn attribute_headers(keys: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = MODULE_HEADERS.iter().map(|h| h.to_lowercase()).collect();
    keys.iter()
        .map(|key| {
            let mut header = key.clone();
            while !used.insert(header.to_lowercase()) {
                header.push_str(ATTRIBUTE_SUFFIX);
            }
            header
        })
        .collect()
}

/// Steps as `1. <instruction>` lines.
pub(crate) fn numbered_steps(case: &TestCase) -> String {
    numbered(case.steps.iter().map(|s| s.steps.as_str()))
}

pub(crate) fn numbered_expected(case: &TestCase) -> String {
    numbered(case.steps.iter().map(|s| s.expected_result.as_str()))
}

fn numbered<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
