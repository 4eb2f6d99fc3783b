//! Integration tests for the finops-export CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const AUDIT_ROWS: &str = r#"[
    {
        "profile": "dev",
        "account_id": "123456789012",
        "untagged_resources": "EC2: i-0abc, RDS: db-1",
        "stopped_instances": "i-0def",
        "unused_volumes": "",
        "unused_eips": "",
        "budget_alerts": "[bold red]Over budget[/]"
    }
]"#;

const COST_ROWS: &str = r#"[
    {
        "profile": "dev",
        "account_id": "123456789012",
        "last_month": 120.5,
        "current_month": 98.25,
        "service_costs": {"Amazon EC2": 60.0, "Amazon S3": 12.75},
        "budget_info": ["Monthly: $98.25 / $200.00"],
        "ec2_summary": {"running": 3, "stopped": 0}
    }
]"#;

fn bin() -> Command {
    Command::cargo_bin("finops-export").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == ext))
        .collect()
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("audit"))
        .stdout(predicate::str::contains("cost"))
        .stdout(predicate::str::contains("trend"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("finops-export"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    bin()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_audit_exports_all_formats() {
    let temp = TempDir::new().unwrap();
    let input = write(temp.path(), "audit.json", AUDIT_ROWS);
    let out = temp.path().join("reports");

    bin()
        .args(["audit", "--format", "pdf,csv,json", "--name", "audit", "--input"])
        .arg(&input)
        .arg("--dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Audit rows loaded"));

    let csv = files_with_extension(&out, "csv");
    assert_eq!(csv.len(), 1);
    let text = fs::read_to_string(&csv[0]).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("\"EC2: i-0abc, RDS: db-1\""));

    let pdf = files_with_extension(&out, "pdf");
    assert_eq!(pdf.len(), 1);
    assert!(fs::read(&pdf[0]).unwrap().starts_with(b"%PDF"));

    assert_eq!(files_with_extension(&out, "json").len(), 1);
}

#[test]
fn test_cost_pdf_with_periods() {
    let temp = TempDir::new().unwrap();
    let input = write(temp.path(), "cost.json", COST_ROWS);

    bin()
        .args(["-q", "cost", "--previous-period", "May", "--current-period", "June", "--input"])
        .arg(&input)
        .arg("--dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let pdf = files_with_extension(temp.path(), "pdf");
    assert_eq!(pdf.len(), 1);
    let name = pdf[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("cost_report_"));
}

#[test]
fn test_cost_rejects_csv() {
    let temp = TempDir::new().unwrap();
    let input = write(temp.path(), "cost.json", COST_ROWS);

    bin()
        .args(["cost", "--format", "csv", "--input"])
        .arg(&input)
        .arg("--dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("CSV export is not available"));
}

#[test]
fn test_trend_json_is_verbatim() {
    let temp = TempDir::new().unwrap();
    let input = write(
        temp.path(),
        "trend.json",
        r#"[{"month": "2025-05", "cost": 120.5}, {"month": "2025-06", "cost": 98.25}]"#,
    );

    bin()
        .args(["trend", "--name", "trend", "--input"])
        .arg(&input)
        .arg("--dir")
        .arg(temp.path().join("out"))
        .assert()
        .success();

    let json = files_with_extension(&temp.path().join("out"), "json");
    assert_eq!(json.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json[0]).unwrap()).unwrap();
    assert_eq!(value[1]["month"], "2025-06");
    assert_eq!(value[0]["cost"], 120.5);
}

#[test]
fn test_config_file_supplies_defaults() {
    let temp = TempDir::new().unwrap();
    let input = write(temp.path(), "audit.json", AUDIT_ROWS);
    let out = temp.path().join("from-config");
    let config = write(
        temp.path(),
        "finops.yaml",
        &format!("report_name: monthly\nreport_type: [json]\ndir: {}\n", out.display()),
    );

    bin()
        .arg("--config")
        .arg(&config)
        .args(["audit", "--input"])
        .arg(&input)
        .assert()
        .success();

    let json = files_with_extension(&out, "json");
    assert_eq!(json.len(), 1);
    let name = json[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("monthly_"));
}

#[test]
fn test_missing_input_fails() {
    let temp = TempDir::new().unwrap();

    bin()
        .args(["audit", "--input"])
        .arg(temp.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_unwritable_dir_fails_once() {
    let temp = TempDir::new().unwrap();
    let input = write(temp.path(), "audit.json", AUDIT_ROWS);
    let blocker = write(temp.path(), "blocker", "x");

    bin()
        .args(["audit", "--input"])
        .arg(&input)
        .arg("--dir")
        .arg(blocker.join("reports"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error exporting audit report to CSV").count(1));
}

#[test]
fn test_config_show_json() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "c.json", r#"{"report_name": "finops", "s3_bucket": "b"}"#);

    bin()
        .args(["config", "show"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"report_name\": \"finops\""));
}

#[test]
fn test_config_show_yaml() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "c.yml", "region: eu-west-1\nreport_type:\n  - pdf\n");

    bin()
        .args(["config", "show"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"region\": \"eu-west-1\""));
}

#[test]
fn test_config_show_toml() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "c.toml", "report_name = \"finops\"\n");

    bin()
        .args(["config", "show"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"report_name\": \"finops\""));
}

#[test]
fn test_config_show_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "c.ini", "[a]\n");

    bin()
        .args(["config", "show"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported configuration file format: .ini"));
}

#[test]
fn test_config_show_non_mapping() {
    let temp = TempDir::new().unwrap();
    let config = write(temp.path(), "c.yaml", "- a\n- b\n");

    bin()
        .args(["config", "show"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not load as a dictionary"));
}
