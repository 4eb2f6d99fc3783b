use super::*;
use crate::cli::output::testing::Recording;
use crate::storage::MemoryStore;
use regex::Regex;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn audit_rows() -> Vec<AuditRow> {
    let mut row = AuditRow::new("dev", "123456789012");
    row.untagged_resources = "EC2: i-0abc\nRDS: db-1".to_string();
    row.stopped_instances = "i-0def".to_string();
    row.budget_alerts = "[red]Over budget[/]".to_string();
    vec![row, AuditRow::new("prod", "210987654321")]
}

fn cost_rows() -> Vec<CostProfileRow> {
    let mut row = CostProfileRow {
        profile: "dev".to_string(),
        account_id: "123456789012".to_string(),
        last_month: 120.5,
        current_month: 98.25,
        ..Default::default()
    };
    row.service_costs.insert("Amazon EC2".to_string(), 60.0);
    row.service_costs.insert("Amazon S3".to_string(), 12.75);
    row.budget_info.push("Monthly: $98.25 / $200.00".to_string());
    row.ec2_summary.insert("running".to_string(), 3);
    vec![row]
}

fn assert_stamped(path: &Path, base: &str, ext: &str) {
    let name = path.file_name().unwrap().to_str().unwrap();
    let pattern = Regex::new(&format!(r"^{base}_\d{{8}}_\d{{4}}\.{ext}$")).unwrap();
    assert!(pattern.is_match(name), "unexpected file name {name}");
}

#[test]
fn test_csv_export_creates_missing_dir() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("reports").join("audit");
    let console = Recording::default();

    let location =
        export_audit_report_to_csv(&audit_rows(), "audit", &ExportTarget::local(Some(&dir)), &console)
            .unwrap();

    let path = Path::new(&location);
    assert!(path.is_absolute());
    assert!(path.starts_with(std::path::absolute(&dir).unwrap()));
    assert_stamped(path, "audit", "csv");

    let text = fs::read_to_string(path).unwrap();
    assert!(text.starts_with("Profile,Account ID,"));
    assert!(text.contains("dev,123456789012"));
    assert!(console.errors.borrow().is_empty());
    // Local writes are silent on success.
    assert!(console.successes.borrow().is_empty());
}

#[test]
fn test_pdf_exports_write_pdf_files() {
    let temp = TempDir::new().unwrap();
    let target = ExportTarget::local(Some(temp.path()));
    let console = Recording::default();

    let audit = export_audit_report_to_pdf(&audit_rows(), "audit", &target, &console).unwrap();
    let cost = export_cost_dashboard_to_pdf(
        &cost_rows(),
        "cost",
        &ReportPeriods::new("2025-05-01 to 2025-05-31", "2025-06-01 to 2025-06-30"),
        &target,
        &console,
    )
    .unwrap();

    for (location, base) in [(&audit, "audit"), (&cost, "cost")] {
        let path = Path::new(location);
        assert_stamped(path, base, "pdf");
        assert!(fs::read(path).unwrap().starts_with(b"%PDF"));
    }
    assert!(console.errors.borrow().is_empty());
}

#[test]
fn test_empty_rows_still_export() {
    let temp = TempDir::new().unwrap();
    let target = ExportTarget::local(Some(temp.path()));
    let console = Recording::default();

    let csv_path = export_audit_report_to_csv(&[], "empty", &target, &console).unwrap();
    assert_eq!(fs::read_to_string(csv_path).unwrap().lines().count(), 1);

    let json_path = export_trend_data_to_json(&[], "empty", &target, &console).unwrap();
    assert_eq!(fs::read_to_string(json_path).unwrap(), "[]");

    assert!(export_audit_report_to_pdf(&[], "empty", &target, &console).is_some());
    assert!(console.errors.borrow().is_empty());
}

#[test]
fn test_json_exports_round_trip() {
    let temp = TempDir::new().unwrap();
    let target = ExportTarget::local(Some(temp.path()));
    let console = Recording::default();

    let rows = audit_rows();
    let path = export_audit_report_to_json(&rows, "audit", &target, &console).unwrap();
    let back: Vec<AuditRow> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, rows);

    let mut trend = TrendRow::new();
    trend.insert("month".to_string(), "2025-06".into());
    trend.insert("cost".to_string(), 98.25.into());
    let path = export_trend_data_to_json(&[trend.clone()], "trend", &target, &console).unwrap();
    let back: Vec<TrendRow> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, vec![trend]);
}

#[test]
fn test_remote_export_puts_one_object() {
    let store = MemoryStore::new();
    let target = ExportTarget::object_store("finops-reports", Some("exports/"), Some(&store));
    let console = Recording::default();

    let uri = export_audit_report_to_csv(&audit_rows(), "audit", &target, &console).unwrap();

    let keys = store.keys("finops-reports");
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("exports/audit_"));
    assert_eq!(uri, format!("s3://finops-reports/{}", keys[0]));

    let object = store.get("finops-reports", &keys[0]).unwrap();
    assert_eq!(object.content_type, "text/csv");
    assert!(object.body.starts_with(b"Profile,"));

    assert_eq!(
        *console.successes.borrow(),
        vec![format!("Successfully exported to S3: {uri}")]
    );
}

#[test]
fn test_remote_pdf_uses_pdf_content_type() {
    let store = MemoryStore::new();
    let target = ExportTarget::object_store("bucket", None, Some(&store));
    let console = Recording::default();

    let uri = export_cost_dashboard_to_pdf(
        &cost_rows(),
        "cost",
        &ReportPeriods::default(),
        &target,
        &console,
    )
    .unwrap();

    let key = uri.strip_prefix("s3://bucket/").unwrap();
    assert!(!key.starts_with('/'));
    assert_eq!(store.get("bucket", key).unwrap().content_type, "application/pdf");
}

#[test]
fn test_access_denied_reports_once() {
    let store = MemoryStore::failing("AccessDenied");
    let target = ExportTarget::object_store("bucket", Some("x"), Some(&store));
    let console = Recording::default();

    assert!(export_json(&[1, 2, 3], "data", &target, &console).is_none());

    let errors = console.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("AccessDenied"));
    assert!(errors[0].starts_with("Error exporting data to JSON: Error uploading to S3"));
    assert!(console.successes.borrow().is_empty());
}

#[test]
fn test_missing_session_fails_without_writing() {
    let console = Recording::default();
    let target = ExportTarget::object_store("bucket", None, None);

    assert!(export_audit_report_to_pdf(&audit_rows(), "audit", &target, &console).is_none());

    let errors = console.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("no storage session"));
}

#[test]
fn test_unwritable_dir_reports_once() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, b"x").unwrap();
    let console = Recording::default();

    let target = ExportTarget::local(Some(blocker.join("reports")));
    assert!(export_audit_report_to_csv(&audit_rows(), "audit", &target, &console).is_none());

    let errors = console.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error exporting audit report to CSV:"));
}

#[test]
fn test_default_periods() {
    let periods = ReportPeriods::default();
    assert_eq!(periods.previous, "N/A");
    assert_eq!(periods.current, "N/A");
}

#[test]
fn test_silent_console_still_returns_location() {
    let temp = TempDir::new().unwrap();
    let target = ExportTarget::local(Some(temp.path()));

    let path = export_json(&serde_json::json!({"ok": true}), "data", &target, &crate::cli::Silent);
    assert!(path.is_some_and(|p| p.ends_with(".json")));
}
