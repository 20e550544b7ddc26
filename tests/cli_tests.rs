//! CLI command tests, calling the handlers directly

use sheetbind::cli::{commands, CommandOptions, RecordKind};
use sheetbind::models::Dept;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DEPTS_JSON: &str = r#"[
  {"dept_id": 100, "dept_name": "Head Office", "status": "0", "create_time": "2024-01-15T09:30:00"},
  {"dept_id": 101, "parent_id": 100, "dept_name": "Research", "leader": "ry", "status": "1"}
]"#;

fn options_in(dir: &TempDir) -> CommandOptions {
    CommandOptions {
        download_dir: Some(dir.path().join("download")),
        ..Default::default()
    }
}

fn only_xlsx(dir: &Path) -> PathBuf {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == "xlsx"))
        .collect();
    assert_eq!(files.len(), 1, "expected exactly one workbook");
    files.remove(0)
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT / IMPORT COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_then_import() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("depts.json");
    fs::write(&input, DEPTS_JSON).unwrap();
    let options = options_in(&dir);

    commands::export(input, RecordKind::Dept, "Departments".to_string(), &options).unwrap();
    let workbook = only_xlsx(&dir.path().join("download"));
    assert!(workbook
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with("_Departments.xlsx"));

    let output = dir.path().join("back.json");
    commands::import(workbook, RecordKind::Dept, None, Some(output.clone()), &options).unwrap();

    let records: Vec<Dept> = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].dept_name, "Head Office");
    assert_eq!(records[1].parent_id, Some(100));
    assert_eq!(records[1].leader.as_deref(), Some("ry"));
}

#[test]
fn test_export_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(&input, "{ not json").unwrap();

    let result = commands::export(input, RecordKind::User, "Users".to_string(), &options_in(&dir));
    assert!(result.is_err());
}

#[test]
fn test_export_nonexistent_input() {
    let dir = TempDir::new().unwrap();
    let result = commands::export(
        dir.path().join("missing.json"),
        RecordKind::Dept,
        "Sheet".to_string(),
        &options_in(&dir),
    );
    assert!(result.is_err());
}

#[test]
fn test_import_missing_sheet_fails() {
    let dir = TempDir::new().unwrap();
    let options = options_in(&dir);
    commands::template(RecordKind::Dept, "Template".to_string(), &options).unwrap();
    let workbook = only_xlsx(&dir.path().join("download"));

    let result = commands::import(
        workbook,
        RecordKind::Dept,
        Some("Nope".to_string()),
        None,
        &options,
    );
    assert!(result.is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// TEMPLATE / COLUMNS / CONFIG TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_template_user() {
    let dir = TempDir::new().unwrap();
    commands::template(RecordKind::User, "Users".to_string(), &options_in(&dir)).unwrap();
    only_xlsx(&dir.path().join("download"));
}

#[test]
fn test_columns_both_kinds() {
    assert!(commands::columns(RecordKind::Dept).is_ok());
    assert!(commands::columns(RecordKind::User).is_ok());
}

#[test]
fn test_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("sheetbind.yaml");
    fs::write(
        &config,
        format!(
            "download_path: {}\nsheet_size: 1\n",
            dir.path().join("from-config").display()
        ),
    )
    .unwrap();
    let input = dir.path().join("depts.json");
    fs::write(&input, DEPTS_JSON).unwrap();

    let options = CommandOptions {
        config: Some(config),
        ..Default::default()
    };
    commands::export(input, RecordKind::Dept, "Paged".to_string(), &options).unwrap();

    let workbook = only_xlsx(&dir.path().join("from-config"));
    let sheets = calamine::open_workbook_auto(workbook).map(|w| {
        use calamine::Reader;
        w.sheet_names()
    });
    assert_eq!(sheets.unwrap(), vec!["Paged0", "Paged1"]);
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.yaml");
    fs::write(&config, "sheet_size: 0\n").unwrap();

    let options = CommandOptions {
        config: Some(config),
        ..Default::default()
    };
    assert!(options.load_config().is_err());
}
