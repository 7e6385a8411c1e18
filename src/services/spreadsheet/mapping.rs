//! Column mapping between sheet headers and test case fields.

use std::collections::BTreeMap;
use std::fmt;

use super::ATTRIBUTE_SUFFIX;

/// Logical test case fields an import can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    TestCaseId,
    UseCase,
    Scenario,
    Steps,
    ExpectedResult,
    Version,
    TestType,
    TestTool,
}

impl Field {
    /// Fields offered by header matching, in matching order.
    pub const MAPPED: [Field; 7] = [
        Field::TestCaseId,
        Field::UseCase,
        Field::Scenario,
        Field::Steps,
        Field::ExpectedResult,
        Field::Version,
        Field::TestType,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TestCaseId => "testCaseId",
            Self::UseCase => "useCase",
            Self::Scenario => "scenario",
            Self::Steps => "steps",
            Self::ExpectedResult => "expectedResult",
            Self::Version => "version",
            Self::TestType => "testType",
            Self::TestTool => "testTool",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TestCaseId => "Test Case ID",
            Self::UseCase => "Use Case",
            Self::Scenario => "Scenario",
            Self::Steps => "Steps",
            Self::ExpectedResult => "Expected Result",
            Self::Version => "Version",
            Self::TestType => "Test Type",
            Self::TestTool => "Test Tool",
        }
    }

    /// Required in mapped imports.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::TestCaseId | Self::UseCase | Self::Scenario | Self::Steps | Self::ExpectedResult
        )
    }

    /// Fixed header used by quick imports.
    pub fn quick_header(&self) -> &'static str {
        match self {
            Self::TestCaseId => "TestCaseID",
            Self::UseCase => "UseCase",
            Self::Scenario => "Scenario",
            Self::Steps => "Steps",
            Self::ExpectedResult => "ExpectedResult",
            Self::Version => "Version",
            Self::TestType => "TestType",
            Self::TestTool => "TestTool",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How rows are validated and normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Headers matched to fields; required fields enforced
    Mapped,
    /// Fixed headers; extra columns become attributes and ids are generated
    Quick,
}

/// Which sheet column feeds each field and attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub mode: ImportMode,
    fields: BTreeMap<Field, String>,
    /// `(attribute key, column)` in declaration order
    attributes: Vec<(String, String)>,
}

/// Match headers to fields: exact match on the lower-cased, trimmed label or
/// field name first, then a header containing either.
pub fn auto_map_columns(headers: &[String]) -> ColumnMapping {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut mapping = ColumnMapping::empty(ImportMode::Mapped);

    for field in Field::MAPPED {
        let label = field.label().to_lowercase();
        let name = field.name().to_lowercase();

        let exact = normalized.iter().position(|h| *h == label || *h == name);
        let found = exact.or_else(|| {
            normalized
                .iter()
                .position(|h| h.contains(&label) || h.contains(&name))
        });

        if let Some(idx) = found {
            mapping.fields.insert(field, headers[idx].clone());
        }
    }

    mapping
}

impl ColumnMapping {
    pub fn empty(mode: ImportMode) -> Self {
        ColumnMapping {
            mode,
            fields: BTreeMap::new(),
            attributes: Vec::new(),
        }
    }

    /// Fixed-header mapping; every other non-blank header becomes an
    /// attribute keyed by the header text, minus a trailing
    /// [`ATTRIBUTE_SUFFIX`].
    pub fn quick(headers: &[String]) -> Self {
        let mut mapping = ColumnMapping::empty(ImportMode::Quick);
        let fixed = [
            Field::TestCaseId,
            Field::UseCase,
            Field::Scenario,
            Field::TestType,
            Field::TestTool,
            Field::Steps,
            Field::ExpectedResult,
        ];

        for header in headers {
            match fixed.iter().find(|f| f.quick_header() == header) {
                Some(field) => {
                    mapping.fields.insert(*field, header.clone());
                }
                None if !header.trim().is_empty() => {
                    let key = header.strip_suffix(ATTRIBUTE_SUFFIX).unwrap_or(header);
                    mapping.attributes.push((key.to_string(), header.clone()));
                }
                None => {}
            }
        }

        mapping
    }

    pub fn map_field(&mut self, field: Field, column: impl Into<String>) {
        self.fields.insert(field, column.into());
    }

    pub fn unmap_field(&mut self, field: Field) {
        self.fields.remove(&field);
    }

    /// Map a custom attribute to a column, replacing an earlier mapping.
    pub fn map_attribute(&mut self, key: impl Into<String>, column: impl Into<String>) {
        let key = key.into();
        let column = column.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = column,
            None => self.attributes.push((key, column)),
        }
    }

    pub fn column(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Required fields without a column; always empty in quick mode.
    pub fn missing_required(&self) -> Vec<Field> {
        if self.mode == ImportMode::Quick {
            return Vec::new();
        }
        Field::MAPPED
            .into_iter()
            .filter(|f| f.is_required() && !self.fields.contains_key(f))
            .collect()
    }

    /// Reject a mapping that leaves required fields unmapped.
    pub fn validate(&self) -> Result<(), String> {
        let missing = self.missing_required();
        if missing.is_empty() {
            return Ok(());
        }
        let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
        Err(format!(
            "Please map all required fields: {}",
            labels.join(", ")
        ))
    }
}
