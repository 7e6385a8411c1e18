//! E2E tests: workbook export to disk and sheet import into the backend.

use rust_xlsxwriter::Workbook;
use tcm_lib::models::{TestCaseResult, VersionSelector};
use tcm_lib::services::spreadsheet::{
    ColumnMapping, auto_map_columns, export_module_workbook, export_run_workbook,
    import_sheet_as_module, module_export_file_name, read_workbook, read_workbook_file,
    run_export_file_name, select_cases,
};
use tcm_lib::services::{fetch_suite_cases, stats_from_suite_cases};

use super::fixtures::*;
use super::mock_backend::{MockBackend, MockState};

const IMPORT_HEADERS: [&str; 6] = [
    "Test Case ID",
    "Use Case",
    "Scenario",
    "Steps",
    "Expected Result",
    "Priority",
];

/// Build a single-sheet workbook; `None` cells are left blank.
fn workbook_bytes(sheet_name: &str, headers: &[&str], rows: &[[Option<&str>; 6]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if let Some(value) = value {
                sheet.write_string(idx as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn mapping_with_priority(headers: &[String]) -> ColumnMapping {
    let mut mapping = auto_map_columns(headers);
    mapping.map_attribute("priority", "Priority");
    mapping
}

/// (1) Five rows with the third missing its use case: four created, one
/// reported as "Row 3".
#[actix_rt::test]
async fn test_import_sheet_creates_module_and_cases() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    let bytes = workbook_bytes(
        "login_flows",
        &IMPORT_HEADERS,
        &[
            [Some("TC-1"), Some("Login"), Some("Valid user"), Some("1. Open\n2. Submit"), Some("1. Form shown\n2. Logged in"), Some("high")],
            [Some("TC-2"), Some("Login"), Some("Wrong password"), Some("Submit"), Some("Error shown"), Some("medium")],
            [Some("TC-3"), None, Some("Locked account"), Some("Submit"), Some("Locked notice"), Some("low")],
            [Some("TC-4"), Some("Logout"), Some("From menu"), Some("Click logout"), Some("Signed out"), None],
            [Some("TC-5"), Some("Logout"), Some("Session expiry"), Some("Wait"), Some("Signed out"), Some("low")],
        ],
    );
    let sheets = read_workbook(&bytes).unwrap();
    assert_eq!(sheets.len(), 1);
    let sheet = &sheets[0];
    assert_eq!(sheet.rows.len(), 5);
    let mapping = mapping_with_priority(&sheet.headers);

    let import = import_sheet_as_module(&client, PRODUCT_ID, sheet, &mapping, "1.0")
        .await
        .unwrap();

    assert_eq!(import.module_name, "Login Flows");
    assert_eq!(import.module_id, "mod-1");
    assert_eq!(import.report.success, 4);
    assert_eq!(import.report.errors, 1);
    assert_eq!(
        import.report.error_messages,
        vec!["Row 3: Missing required value: Use Case".to_string()]
    );

    let state = mock.state();
    assert_eq!(state.created_modules.len(), 1);
    assert_eq!(
        state.created_modules[0].description.as_deref(),
        Some("Module created from imported sheet: login_flows")
    );

    let ids: Vec<&str> = state
        .created_cases
        .iter()
        .map(|c| c.test_case_id.as_str())
        .collect();
    assert_eq!(ids, vec!["TC-1", "TC-2", "TC-4", "TC-5"]);
    assert_eq!(state.created_cases[0].steps.len(), 2);
    assert_eq!(state.created_cases[0].steps[1].expected_result, "Logged in");
    assert_eq!(state.created_cases[1].version.as_deref(), Some("1.0"));

    // TC-4 has no priority, so only three attribute posts
    assert_eq!(state.attribute_posts.len(), 3);
    assert_eq!(state.attribute_posts[0].0, "case-1");
    assert_eq!(state.attribute_posts[0].1.key, "priority");
    assert_eq!(state.attribute_posts[0].1.value, "high");
}

/// (2) Server-side rejections become row errors and the import continues.
#[actix_rt::test]
async fn test_import_reports_duplicate_ids() {
    let mock = MockBackend::start(MockState {
        cases: vec![case("existing", "m1", "v1.0")],
        ..Default::default()
    })
    .await;
    let client = client_for(&mock);

    let bytes = workbook_bytes(
        "Regression",
        &IMPORT_HEADERS,
        &[
            [Some("TC-new"), Some("Search"), Some("By name"), Some("Type"), Some("Results"), None],
            [Some("TC-existing"), Some("Search"), Some("Empty"), Some("Type"), Some("No results"), None],
        ],
    );
    let sheets = read_workbook(&bytes).unwrap();
    let mapping = mapping_with_priority(&sheets[0].headers);

    let import = import_sheet_as_module(&client, PRODUCT_ID, &sheets[0], &mapping, "1.0")
        .await
        .unwrap();

    assert_eq!(import.report.success, 1);
    assert_eq!(
        import.report.error_messages,
        vec!["Row 2: Test case ID TC-existing already exists".to_string()]
    );
}

/// (3) An incomplete mapping is rejected before a module is created.
#[actix_rt::test]
async fn test_import_rejects_incomplete_mapping() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    let bytes = workbook_bytes(
        "Partial",
        &["Test Case ID", "Title", "Scenario", "Steps", "Expected Result", "Priority"],
        &[[Some("TC-1"), Some("Login"), Some("Valid"), Some("Go"), Some("Ok"), None]],
    );
    let sheets = read_workbook(&bytes).unwrap();
    let mapping = auto_map_columns(&sheets[0].headers);

    let err = import_sheet_as_module(&client, PRODUCT_ID, &sheets[0], &mapping, "1.0")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Please map all required fields: Use Case"));
    assert_eq!(mock.request_count(), 0);
}

/// (4) Module export written to disk reads back one sheet per version.
#[test]
fn test_module_export_round_trip_on_disk() {
    let cases = vec![
        case("c1", "m1", "v1.0").with_attribute("priority", "high"),
        case("c2", "m1", "v2.0").with_result(TestCaseResult::Pass),
        case("c3", "m1", "v2.0").with_attribute("browser", "chrome"),
    ];
    let bytes = export_module_workbook(&cases, &VersionSelector::All).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(module_export_file_name("Login Flows"));
    std::fs::write(&path, &bytes).unwrap();
    assert!(path.ends_with("Login_Flows_Test_Cases.xlsx"));

    let sheets = read_workbook_file(&path).unwrap();
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["v2.0", "v1.0"]);

    let latest = &sheets[0];
    assert_eq!(latest.headers.last().map(String::as_str), Some("browser"));
    assert_eq!(latest.rows.len(), 2);
    assert_eq!(latest.rows[0]["Test Case ID"], "TC-c2");
    assert_eq!(latest.rows[0]["Result"], "Pass");
    assert_eq!(latest.rows[1]["Result"], "Pending");
    assert_eq!(latest.rows[1]["browser"], "chrome");

    assert_eq!(sheets[1].rows[0]["priority"], "high");
}

/// (5) Module export names the file after the module and counts only the
/// selected version's cases.
#[actix_rt::test]
async fn test_module_export_uses_module_name() {
    let mock = MockBackend::start(MockState {
        modules: vec![module("m1", "User Login")],
        cases: vec![
            case("c1", "m1", "v1.0"),
            case("c2", "m1", "v2.0"),
            case("c3", "m1", "v2.0"),
        ],
        ..Default::default()
    })
    .await;
    let client = client_for(&mock);
    let selector = VersionSelector::parse("v2.0");

    let module = client.modules().get(PRODUCT_ID, "m1").await.unwrap();
    let cases = client.test_cases().list_details("m1").await.unwrap();

    assert_eq!(
        module_export_file_name(&module.name),
        "User_Login_Test_Cases.xlsx"
    );
    assert_eq!(cases.len(), 3);
    assert_eq!(select_cases(&cases, &selector).len(), 2);

    let sheets = read_workbook(&export_module_workbook(&cases, &selector).unwrap()).unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].rows.len(), 2);
}

/// (6) Run export: summary sheet plus one results sheet per suite.
#[actix_rt::test]
async fn test_run_export_from_backend() {
    let mut initial = MockState::default();
    initial.suites.insert(
        "s1".to_string(),
        vec![
            case_with("c1", TestCaseResult::Pass),
            case_with("c2", TestCaseResult::Blocked),
        ],
    );
    initial
        .suites
        .insert("s2".to_string(), vec![case_with("c3", TestCaseResult::Fail)]);
    let mock = MockBackend::start(initial).await;
    let client = client_for(&mock);
    let run = run("r1", &["s1", "s2"]);

    let suites = fetch_suite_cases(&client, &run).await.unwrap();
    let stats = stats_from_suite_cases(&run, &suites);
    let bytes = export_run_workbook(&stats, &suites).unwrap();

    assert_eq!(run_export_file_name(&run.name), "Sprint 12_All_Test_Suites.xlsx");

    let sheets = read_workbook(&bytes).unwrap();
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Summary", "Suite s1", "Suite s2"]);

    let s1 = &sheets[1];
    assert_eq!(s1.rows.len(), 2);
    assert_eq!(s1.rows[0]["Result"], "Pass");
    assert_eq!(s1.rows[1]["Result"], "Blocked");
    assert_eq!(sheets[2].rows[0]["Test Case ID"], "TC-c3");
}
