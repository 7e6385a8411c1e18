//! Workbook import: read sheets, normalize rows, create test cases.

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use calamine::{Reader, Xlsx};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::mapping::{ColumnMapping, Field, ImportMode};
use crate::api::TestCaseCreator;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateModuleRequest, CreateTestCaseRequest, TestCaseAttribute, TestCaseAttributeRequest,
    TestCaseStep, TestType,
};

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One worksheet: header row plus data rows keyed by header.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    /// Header cells in column order, blanks included
    pub headers: Vec<String>,
    /// Non-blank data rows, header -> trimmed cell text
    pub rows: Vec<HashMap<String, String>>,
}

/// Read every worksheet of an `.xlsx` workbook held in memory.
pub fn read_workbook(bytes: &[u8]) -> AppResult<Vec<SheetData>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    let names = workbook.sheet_names();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = match workbook.worksheet_range(&name) {
            Some(Ok(range)) => range,
            Some(Err(e)) => {
                return Err(AppError::Spreadsheet(format!(
                    "Cannot read sheet '{}': {}",
                    name, e
                )));
            }
            None => continue,
        };

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(row) => row.iter().map(|c| c.to_string().trim().to_string()).collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for row in rows_iter {
            let mut cells = HashMap::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                if header.is_empty() || cells.contains_key(header) {
                    continue;
                }
                cells.insert(header.clone(), cell.to_string().trim().to_string());
            }
            if cells.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(cells);
        }

        debug!("Read sheet '{}': {} columns, {} rows", name, headers.len(), rows.len());
        sheets.push(SheetData {
            name,
            headers,
            rows,
        });
    }

    Ok(sheets)
}

/// Read a workbook from disk.
pub fn read_workbook_file(path: impl AsRef<Path>) -> AppResult<Vec<SheetData>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Io(format!("Cannot read {}: {}", path.display(), e)))?;
    read_workbook(&bytes)
}

/// A validated row ready to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// 1-based position among the sheet's data rows
    pub row: usize,
    pub test_case_id: String,
    pub use_case: String,
    pub scenario: String,
    pub version: Option<String>,
    pub test_type: TestType,
    pub test_tool: Option<String>,
    pub steps: Vec<TestCaseStep>,
    pub attributes: Vec<TestCaseAttribute>,
}

impl ImportRow {
    fn create_request(&self, module_id: &str, default_version: &str) -> CreateTestCaseRequest {
        CreateTestCaseRequest {
            module_id: module_id.to_string(),
            version: Some(
                self.version
                    .clone()
                    .unwrap_or_else(|| default_version.to_string()),
            ),
            test_case_id: self.test_case_id.clone(),
            use_case: self.use_case.clone(),
            scenario: self.scenario.clone(),
            test_type: self.test_type,
            test_tool: self.test_tool.clone(),
            steps: self.steps.clone(),
        }
    }
}

/// A row that was rejected during normalization or creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

/// Counts and per-row messages of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: usize,
    pub errors: usize,
    pub error_messages: Vec<String>,
}

impl ImportReport {
    fn reject(&mut self, error: RowError) {
        self.errors += 1;
        self.error_messages.push(error.to_string());
    }
}

/// Result of importing a sheet into a newly created module.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleImport {
    pub module_id: String,
    pub module_name: String,
    pub report: ImportReport,
}

/// Validate and normalize every data row of a sheet.
pub fn normalize_rows(
    sheet: &SheetData,
    mapping: &ColumnMapping,
) -> Vec<Result<ImportRow, RowError>> {
    sheet
        .rows
        .iter()
        .enumerate()
        .map(|(idx, cells)| {
            normalize_row(idx + 1, cells, mapping).map_err(|message| RowError {
                row: idx + 1,
                message,
            })
        })
        .collect()
}

fn normalize_row(
    row: usize,
    cells: &HashMap<String, String>,
    mapping: &ColumnMapping,
) -> Result<ImportRow, String> {
    let value = |field: Field| cell(cells, mapping, field);

    if mapping.mode == ImportMode::Mapped {
        let missing: Vec<&str> = Field::MAPPED
            .into_iter()
            .filter(|f| f.is_required() && value(*f).is_empty())
            .map(|f| f.label())
            .collect();
        if !missing.is_empty() {
            return Err(format!("Missing required value: {}", missing.join(", ")));
        }
    }

    let test_type = match value(Field::TestType) {
        "" => TestType::Manual,
        raw => TestType::parse(raw).ok_or_else(|| format!("Unknown test type '{}'", raw))?,
    };

    let steps = parse_steps(value(Field::Steps), value(Field::ExpectedResult))?;

    let test_case_id = match value(Field::TestCaseId) {
        "" if mapping.mode == ImportMode::Quick => generate_test_case_id(),
        id => id.to_string(),
    };

    let attributes = mapping
        .attributes()
        .iter()
        .filter_map(|(key, column)| {
            let v = cells.get(column).map(|v| v.trim()).unwrap_or("");
            (!v.is_empty()).then(|| TestCaseAttribute::new(key.clone(), v))
        })
        .collect();

    let optional = |field: Field| {
        let v = value(field);
        (!v.is_empty()).then(|| v.to_string())
    };

    Ok(ImportRow {
        row,
        test_case_id,
        use_case: value(Field::UseCase).to_string(),
        scenario: value(Field::Scenario).to_string(),
        version: optional(Field::Version),
        test_type,
        test_tool: optional(Field::TestTool),
        steps,
        attributes,
    })
}

fn cell<'a>(cells: &'a HashMap<String, String>, mapping: &ColumnMapping, field: Field) -> &'a str {
    mapping
        .column(field)
        .and_then(|column| cells.get(column))
        .map(|v| v.trim())
        .unwrap_or("")
}

/// Turn step and expected-result cells into steps.
///
/// A cell starting with `[` must be a JSON array of steps. Numbered lines
/// (`1. ...`) split into one step each; anything else is a single step.
pub(crate) fn parse_steps(steps: &str, expected: &str) -> Result<Vec<TestCaseStep>, String> {
    let steps = steps.trim();
    let expected = expected.trim();

    if steps.starts_with('[') {
        return serde_json::from_str::<Vec<TestCaseStep>>(steps)
            .map_err(|e| format!("Malformed steps JSON: {}", e));
    }
    if steps.is_empty() && expected.is_empty() {
        return Ok(Vec::new());
    }

    let instructions = match split_numbered(steps) {
        Some(lines) => lines,
        None => return Ok(vec![TestCaseStep::new(steps, expected)]),
    };

    let expectations = split_numbered(expected).filter(|e| e.len() == instructions.len());
    let last = instructions.len() - 1;
    Ok(instructions
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let outcome = match expectations {
                Some(ref e) => e[i].clone(),
                None if i == last => expected.to_string(),
                None => String::new(),
            };
            TestCaseStep::new(text, outcome)
        })
        .collect())
}

/// Split `1. a\n2. b` into `["a", "b"]`; `None` unless every line is numbered.
///
/// The period must be followed by whitespace or end the line, so `1.5 x` is
/// not a numbered line.
fn split_numbered(text: &str) -> Option<Vec<String>> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return None;
    }
    lines
        .iter()
        .map(|line| {
            let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            line[digits..]
                .strip_prefix('.')
                .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
                .map(|rest| rest.trim().to_string())
        })
        .collect()
}

/// Client-side fallback business id: `TC-` followed by 7 base-36 characters.
pub fn generate_test_case_id() -> String {
    let bytes: [u8; 7] = rand::random();
    let suffix: String = bytes
        .iter()
        .map(|b| ID_ALPHABET[(*b as usize) % ID_ALPHABET.len()] as char)
        .collect();
    format!("TC-{}", suffix)
}

/// Module name derived from a sheet name: separators to spaces, words
/// title-cased.
pub fn module_name_from_sheet(sheet_name: &str) -> String {
    sheet_name
        .replace(['_', '-'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Create one test case per valid row, in order.
///
/// Rejected rows and failed creations are counted and reported as
/// `Row N: <reason>`; the batch always runs to the end. Attribute values are
/// posted after each create and their failures are only logged.
pub async fn import_rows<C>(
    creator: &C,
    module_id: &str,
    rows: Vec<Result<ImportRow, RowError>>,
    default_version: &str,
) -> AppResult<ImportReport>
where
    C: TestCaseCreator + ?Sized,
{
    if module_id.trim().is_empty() {
        return Err(AppError::InvalidInput("Module ID is required".to_string()));
    }

    let mut report = ImportReport::default();

    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                report.reject(e);
                continue;
            }
        };

        let request = row.create_request(module_id, default_version);
        let case_id = match creator.create_case(module_id, &request).await {
            Ok(id) => id,
            Err(e) => {
                report.reject(RowError {
                    row: row.row,
                    message: e.user_message(),
                });
                continue;
            }
        };
        report.success += 1;

        for attr in &row.attributes {
            let attr_request = TestCaseAttributeRequest::from(attr.clone());
            if let Err(e) = creator.add_case_attribute(&case_id, &attr_request).await {
                warn!(
                    "Failed to add attribute {} to test case {}: {}",
                    attr.key, row.test_case_id, e
                );
            }
        }
    }

    info!(
        "Imported into module {}: {} created, {} failed",
        module_id, report.success, report.errors
    );
    Ok(report)
}

/// Create a module named after the sheet and import the sheet into it.
///
/// The mapping is validated before anything is created.
pub async fn import_sheet_as_module<C>(
    creator: &C,
    product_id: &str,
    sheet: &SheetData,
    mapping: &ColumnMapping,
    default_version: &str,
) -> AppResult<ModuleImport>
where
    C: TestCaseCreator + ?Sized,
{
    if product_id.trim().is_empty() {
        return Err(AppError::InvalidInput("Product ID is required".to_string()));
    }
    mapping.validate().map_err(AppError::InvalidInput)?;

    let module_name = module_name_from_sheet(&sheet.name);
    let request = CreateModuleRequest {
        product_id: product_id.to_string(),
        name: module_name.clone(),
        description: Some(format!(
            "Module created from imported sheet: {}",
            sheet.name
        )),
        is_active: true,
        version: default_version.to_string(),
    };
    let module_id = creator.create_module(product_id, &request).await?;
    info!("Created module {} ({}) for sheet '{}'", module_name, module_id, sheet.name);

    let rows = normalize_rows(sheet, mapping);
    let report = import_rows(creator, &module_id, rows, default_version).await?;

    Ok(ModuleImport {
        module_id,
        module_name,
        report,
    })
}
