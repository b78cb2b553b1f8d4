//! Integration tests driving the sheetline binary against CSV workbooks.

use std::path::Path;
use std::process::Command;

fn run_command(root: &Path, args: &[&str]) -> (String, String, i32) {
    // Tests must be deterministic and not depend on a user's config file.
    let config = root.join("config.toml");
    if !config.exists() {
        std::fs::write(&config, "").expect("write empty config");
    }

    let output = Command::new(env!("CARGO_BIN_EXE_sheetline"))
        .arg("--config")
        .arg(&config)
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("SHEETLINE_ROOT")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn workbook() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let book = dir.path().join("book");
    std::fs::create_dir(&book).unwrap();
    std::fs::write(book.join("People.csv"), "name,age,city\nann,31,oslo\nbo,27,rome\n").unwrap();
    std::fs::write(book.join("Rates.csv"), "usd,1\neur,0.9\nusd,1.1\n").unwrap();
    dir
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is JSON")
}

#[test]
fn test_get_list() {
    let dir = workbook();
    let (stdout, _, code) = run_command(
        dir.path(),
        &["get", "--id", "book", "--range", "People", "A1", "B2"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout), serde_json::json!([["name", "age"], ["ann", 31.0]]));
}

#[test]
fn test_get_key_value_last_write_wins() {
    let dir = workbook();
    let (stdout, _, code) = run_command(
        dir.path(),
        &["get", "--id", "book", "--range", "Rates", "--type", "KEY_VALUE"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout), serde_json::json!({"usd": 1.1, "eur": 0.9}));
}

#[test]
fn test_get_key_pair_with_limit() {
    let dir = workbook();
    let (stdout, _, code) = run_command(
        dir.path(),
        &["get", "--id", "book", "--range", "People", "--type", "KEY_PAIR", "--limit", "1"],
    );
    assert_eq!(code, 0);
    assert_eq!(
        json(&stdout),
        serde_json::json!([{"name": "ann", "age": 31.0, "city": "oslo"}])
    );
}

#[test]
fn test_get_without_range_fails() {
    let dir = workbook();
    let (stdout, stderr, code) = run_command(dir.path(), &["get", "--id", "book"]);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error (400)"));
    assert_eq!(code, 1);
}

#[test]
fn test_get_unknown_spreadsheet_fails() {
    let dir = workbook();
    let (_, stderr, code) = run_command(dir.path(), &["get", "--id", "nope", "--range", "People"]);
    assert!(stderr.contains("Error (404)"));
    assert_eq!(code, 1);
}

#[test]
fn test_append_then_read_back() {
    let dir = workbook();
    let (stdout, _, code) = run_command(
        dir.path(),
        &[
            "append", "--id", "book", "--sheet-name", "People", "--sheet-id", "0",
            "--data", r#"[{"city": "lima", "name": "cy"}]"#, "--bg", "240,240,240",
        ],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["updatedRange"], "People!A4:C4");

    let (stdout, _, _) = run_command(
        dir.path(),
        &["get", "--id", "book", "--range", "People", "A4", "C4"],
    );
    assert_eq!(json(&stdout), serde_json::json!([["cy", "", "lima"]]));
}

#[test]
fn test_append_with_no_matching_columns_conflicts() {
    let dir = workbook();
    let (_, stderr, code) = run_command(
        dir.path(),
        &["append", "--id", "book", "--sheet-name", "People", "--data", r#"[{"zip": "1"}]"#],
    );
    assert!(stderr.contains("Error (409)"));
    assert_eq!(code, 1);
}

#[test]
fn test_update_from_file() {
    let dir = workbook();
    let values = dir.path().join("values.json");
    std::fs::write(&values, r#"[{"age": 32, "name": "ann"}]"#).unwrap();
    let arg = format!("@{}", values.display());

    let (stdout, _, code) = run_command(
        dir.path(),
        &["update", "--id", "book", "--range", "People", "A2", "--values", arg.as_str()],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["range"], "People!A2:C2");

    let (stdout, _, _) = run_command(
        dir.path(),
        &["get", "--id", "book", "--range", "People", "A2", "C2"],
    );
    assert_eq!(json(&stdout), serde_json::json!([["ann", 32.0]]));
}

#[test]
fn test_bad_config_warns_once_and_falls_back() {
    let dir = workbook();
    std::fs::write(dir.path().join("config.toml"), "[style\n").unwrap();

    let (stdout, stderr, code) = run_command(
        dir.path(),
        &["get", "--id", "book", "--range", "People", "A1", "A1"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout), serde_json::json!([["name"]]));
    assert_eq!(stderr.matches("Failed to parse").count(), 1, "stderr: {stderr}");
    assert!(stderr.starts_with("Warning: "));
}
