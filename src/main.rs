//! Test case console - command line entry point.
//!
//! Usage:
//!   tcm run-stats --product <id> --run <id> [--read-only]
//!   tcm summary --product <id>
//!   tcm export-module --product <id> --module <id> [--version <label>|all] [--out <file>]
//!   tcm help    (lists every command)

use std::env;
use std::path::PathBuf;

use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use tcm_lib::api::ApiClient;
use tcm_lib::config::{Config, RunStatusPolicy};
use tcm_lib::error::AppResult;
use tcm_lib::models::{TestCaseResult, VersionSelector};
use tcm_lib::services::spreadsheet::{
    self, ColumnMapping, Field, ImportReport, SuiteSheet, auto_map_columns,
};
use tcm_lib::services::{
    self as svc, BatchReport, CaseEdit, RunProgress, StatusUpdate,
};

/// Perform health check (config loads and a client can be built).
fn health_check() -> bool {
    match Config::from_env() {
        Ok(config) => ApiClient::new(&config).is_ok(),
        Err(_) => false,
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }
    let command = args[1].as_str();
    if matches!(command, "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, TCM_API_URL and TCM_SESSION_TOKEN must be set");
            std::process::exit(1);
        }
    };

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode against {}", config.api_url);
    }

    let client = match ApiClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error creating API client: {}", e);
            std::process::exit(1);
        }
    };

    let result = match command {
        "run-stats" => run_stats(&client, &config, &args).await,
        "summary" => summary(&client, &args).await,
        "sync-attributes" => sync_attributes(&client, &args).await,
        "record" => record_result(&client, &config, &args).await,
        "export-module" => export_module(&client, &args).await,
        "export-run" => export_run(&client, &args).await,
        "import" => import(&client, &config, &args).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        error!("Command '{}' failed: {}", command, e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let mut i = 2;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn require_arg(args: &[String], flag: &str) -> String {
    match arg_value(args, flag) {
        Some(v) => v,
        None => {
            eprintln!("Error: {} is required", flag);
            std::process::exit(1);
        }
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().skip(2).any(|a| a == flag)
}

async fn run_stats(client: &ApiClient, config: &Config, args: &[String]) -> AppResult<()> {
    let product_id = require_arg(args, "--product");
    let run_id = require_arg(args, "--run");
    let policy = if has_flag(args, "--read-only") {
        RunStatusPolicy::ReadOnly
    } else {
        config.run_status_policy
    };

    let run = client.test_runs().get(&product_id, &run_id).await?;
    let progress = svc::refresh_run_progress(client, client, &run, policy).await?;
    print_progress(&progress);
    Ok(())
}

fn print_progress(progress: &RunProgress) {
    let stats = &progress.stats;
    println!();
    println!("Run:        {} ({})", stats.run_name, stats.run_id);
    println!("Status:     {} (stored: {})", stats.status, stats.metadata.stored_status);
    println!(
        "Total: {}  Passed: {}  Failed: {}  Pending: {}  Completion: {}%",
        stats.total, stats.passed, stats.failed, stats.pending, stats.completion
    );
    println!();
    println!(
        "{:<30} {:>7} {:>7} {:>7} {:>8} {:>6}",
        "SUITE", "TOTAL", "PASSED", "FAILED", "PENDING", "DONE"
    );
    println!("{}", "-".repeat(70));
    for suite in &stats.suites {
        println!(
            "{:<30} {:>7} {:>7} {:>7} {:>8} {:>5}%",
            truncate(&suite.suite_name, 30),
            suite.total,
            suite.passed,
            suite.failed,
            suite.pending,
            suite.completion
        );
    }
    println!();
    match &progress.status_update {
        StatusUpdate::Skipped => println!("Run status left unchanged (read-only)."),
        StatusUpdate::Stored(status) => println!("Run status stored: {}", status),
        StatusUpdate::Failed(message) => println!("Warning: failed to store run status: {}", message),
    }
}

async fn summary(client: &ApiClient, args: &[String]) -> AppResult<()> {
    let product_id = require_arg(args, "--product");
    let matrix = svc::load_product_summary(client, &product_id).await?;

    if matrix.versions.is_empty() {
        println!("No test cases found.");
        return Ok(());
    }

    println!();
    print!("{:<30}", "MODULE");
    for version in &matrix.versions {
        print!(" {:>10}", truncate(version, 10));
    }
    println!(" {:>8}", "TOTAL");
    println!("{}", "-".repeat(30 + 11 * matrix.versions.len() + 9));

    for module in &matrix.modules {
        print!("{:<30}", truncate(&module.name, 30));
        for version in &matrix.versions {
            print!(" {:>10}", matrix.count(&module.id, version));
        }
        println!(" {:>8}", matrix.module_total(&module.id));
    }

    print!("{:<30}", "TOTAL");
    for version in &matrix.versions {
        print!(" {:>10}", matrix.version_total(version));
    }
    println!(" {:>8}", matrix.grand_total());
    println!();
    Ok(())
}

async fn sync_attributes(client: &ApiClient, args: &[String]) -> AppResult<()> {
    let module_id = require_arg(args, "--module");
    let report = svc::sync_module_attributes(client, &module_id).await?;
    print_batch("Attribute sync", &report);
    Ok(())
}

async fn record_result(client: &ApiClient, config: &Config, args: &[String]) -> AppResult<()> {
    let module_id = require_arg(args, "--module");
    let case_id = require_arg(args, "--case");
    let raw_result = require_arg(args, "--result");
    let result = match TestCaseResult::parse(&raw_result) {
        Some(r) => r,
        None => {
            eprintln!("Error: unknown result '{}' (Pass, Fail, Pending, Blocked)", raw_result);
            std::process::exit(1);
        }
    };

    let case = client.test_cases().get(&module_id, &case_id).await?;
    let mut edit = CaseEdit::new(case, result);
    if let Some(actual) = arg_value(args, "--actual") {
        edit = edit.with_actual(actual);
    }
    if let Some(remarks) = arg_value(args, "--remarks") {
        edit = edit.with_remarks(remarks);
    }

    let report = svc::submit_results(client, &[edit]).await;
    print_batch("Result submission", &report);

    if let (Some(product_id), Some(run_id)) = (arg_value(args, "--product"), arg_value(args, "--run")) {
        let run = client.test_runs().get(&product_id, &run_id).await?;
        let progress =
            svc::refresh_run_progress(client, client, &run, config.run_status_policy).await?;
        print_progress(&progress);
    }
    Ok(())
}

fn print_batch(title: &str, report: &BatchReport) {
    println!(
        "{}: {} updated, {} unchanged, {} failed",
        title,
        report.succeeded,
        report.unchanged,
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  {}: {}", failure.test_case_id, failure.message);
    }
}

async fn export_module(client: &ApiClient, args: &[String]) -> AppResult<()> {
    let product_id = require_arg(args, "--product");
    let module_id = require_arg(args, "--module");
    let selector = arg_value(args, "--version")
        .map(|v| VersionSelector::parse(&v))
        .unwrap_or(VersionSelector::All);

    let module = client.modules().get(&product_id, &module_id).await?;
    let out = arg_value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(spreadsheet::module_export_file_name(&module.name)));

    let cases = client.test_cases().list_details(&module_id).await?;
    let bytes = spreadsheet::export_module_workbook(&cases, &selector)?;
    tokio::fs::write(&out, bytes).await?;
    println!(
        "Exported {} test cases to {}",
        spreadsheet::select_cases(&cases, &selector).len(),
        out.display()
    );
    Ok(())
}

async fn export_run(client: &ApiClient, args: &[String]) -> AppResult<()> {
    let product_id = require_arg(args, "--product");
    let run_id = require_arg(args, "--run");

    let run = client.test_runs().get(&product_id, &run_id).await?;
    let suites = svc::fetch_suite_cases(client, &run).await?;

    let (bytes, default_name) = match arg_value(args, "--suite") {
        Some(suite_id) => {
            let suite = suites.iter().find(|s| s.suite_id == suite_id).ok_or_else(|| {
                tcm_lib::error::AppError::NotFound(format!("Test suite {} in run {}", suite_id, run_id))
            })?;
            let bytes = spreadsheet::export_suite_workbook(SuiteSheet {
                name: &suite.suite_name,
                cases: &suite.cases,
            })?;
            (bytes, spreadsheet::suite_export_file_name(&suite.suite_name))
        }
        None => {
            let stats = svc::stats_from_suite_cases(&run, &suites);
            let bytes = spreadsheet::export_run_workbook(&stats, &suites)?;
            (bytes, spreadsheet::run_export_file_name(&run.name))
        }
    };

    let out = arg_value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_name));
    tokio::fs::write(&out, bytes).await?;
    println!("Exported run {} to {}", run.name, out.display());
    Ok(())
}

async fn import(client: &ApiClient, config: &Config, args: &[String]) -> AppResult<()> {
    let product_id = require_arg(args, "--product");
    let file = require_arg(args, "--file");

    let sheets = spreadsheet::read_workbook_file(&file)?;
    let sheet = match arg_value(args, "--sheet") {
        Some(name) => sheets.into_iter().find(|s| s.name == name),
        None => sheets.into_iter().next(),
    };
    let Some(sheet) = sheet else {
        eprintln!("Error: no matching worksheet in {}", file);
        std::process::exit(1);
    };

    let mapping = if has_flag(args, "--quick") {
        ColumnMapping::quick(&sheet.headers)
    } else {
        auto_map_columns(&sheet.headers)
    };
    print_mapping(&mapping);
    info!("Importing sheet '{}' ({} rows)", sheet.name, sheet.rows.len());

    let report = match arg_value(args, "--module") {
        Some(module_id) => {
            mapping.validate().map_err(tcm_lib::error::AppError::InvalidInput)?;
            let rows = spreadsheet::normalize_rows(&sheet, &mapping);
            spreadsheet::import_rows(client, &module_id, rows, &config.default_version).await?
        }
        None => {
            let imported = spreadsheet::import_sheet_as_module(
                client,
                &product_id,
                &sheet,
                &mapping,
                &config.default_version,
            )
            .await?;
            println!("Created module {} ({})", imported.module_name, imported.module_id);
            imported.report
        }
    };

    print_import(&report);
    Ok(())
}

fn print_mapping(mapping: &ColumnMapping) {
    println!();
    println!("{:<18} {}", "FIELD", "COLUMN");
    println!("{}", "-".repeat(40));
    for field in Field::MAPPED {
        let column = mapping.column(field).unwrap_or("(unmapped)");
        println!("{:<18} {}", field.label(), column);
    }
    for (key, column) in mapping.attributes() {
        println!("{:<18} {}", format!("[{}]", key), column);
    }
    println!();
}

fn print_import(report: &ImportReport) {
    println!(
        "Successfully imported {} test cases. {} failed.",
        report.success, report.errors
    );
    for message in &report.error_messages {
        println!("  {}", message);
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let head: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: tcm <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run-stats --product <id> --run <id> [--read-only]");
    eprintln!("                        Show run progress and store the derived status");
    eprintln!("  summary --product <id>");
    eprintln!("                        Test case counts per module and version");
    eprintln!("  sync-attributes --module <id>");
    eprintln!("                        Align case attributes with the module schema");
    eprintln!("  record --module <id> --case <id> --result <Pass|Fail|Pending|Blocked>");
    eprintln!("         [--actual <text>] [--remarks <text>] [--product <id> --run <id>]");
    eprintln!("                        Record a result, optionally refreshing a run");
    eprintln!("  export-module --product <id> --module <id> [--version <label>|all]");
    eprintln!("                [--out <file>]");
    eprintln!("  export-run --product <id> --run <id> [--suite <id>] [--out <file>]");
    eprintln!("  import --product <id> --file <xlsx> [--sheet <name>] [--module <id>] [--quick]");
    eprintln!("  help                  Show this help");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --health-check        Exit 0 when configuration is valid");
    eprintln!();
}
