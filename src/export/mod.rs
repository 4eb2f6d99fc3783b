//! Report export pipeline
//!
//! Every operation builds its whole buffer in memory, then hands it to the
//! sink for exactly one write. Failures are reported once through the
//! [`Console`] and come back as `None`; nothing here panics or returns an
//! error to the caller.

pub mod csv;
pub mod format;
pub mod json;
pub mod markup;
pub mod pdf;
pub mod sink;

pub use format::ExportFormat;
pub use sink::{Delivered, ExportTarget, object_key, upload, write_local};

use crate::cli::output::Console;
use crate::error::ExportError;
use crate::report::{AuditRow, CostProfileRow, TrendRow};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

/// Period labels shown at the top of a cost report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPeriods {
    pub previous: String,
    pub current: String,
}

impl ReportPeriods {
    pub fn new(previous: impl Into<String>, current: impl Into<String>) -> Self {
        Self {
            previous: previous.into(),
            current: current.into(),
        }
    }
}

impl Default for ReportPeriods {
    fn default() -> Self {
        Self::new("N/A", "N/A")
    }
}

/// Export audit rows as a PDF report.
pub fn export_audit_report_to_pdf(
    rows: &[AuditRow],
    file_name: &str,
    target: &ExportTarget<'_>,
    console: &dyn Console,
) -> Option<String> {
    run_export(ExportFormat::Pdf, "audit report", file_name, target, console, |at| {
        pdf::render(&pdf::compose_audit(rows, at))
    })
}

/// Export audit rows as CSV, one line per row under a fixed header.
pub fn export_audit_report_to_csv(
    rows: &[AuditRow],
    file_name: &str,
    target: &ExportTarget<'_>,
    console: &dyn Console,
) -> Option<String> {
    run_export(ExportFormat::Csv, "audit report", file_name, target, console, |_| {
        csv::encode_audit_csv(rows)
    })
}

/// Export raw audit data as JSON.
pub fn export_audit_report_to_json<T: Serialize + ?Sized>(
    data: &T,
    file_name: &str,
    target: &ExportTarget<'_>,
    console: &dyn Console,
) -> Option<String> {
    run_export(ExportFormat::Json, "audit report", file_name, target, console, |_| {
        json::encode_json(data)
    })
}

/// Export trend rows as JSON, keys and values verbatim.
pub fn export_trend_data_to_json(
    rows: &[TrendRow],
    file_name: &str,
    target: &ExportTarget<'_>,
    console: &dyn Console,
) -> Option<String> {
    run_export(ExportFormat::Json, "trend data", file_name, target, console, |_| {
        json::encode_json(rows)
    })
}

/// Export per-profile cost summaries as a PDF report.
pub fn export_cost_dashboard_to_pdf(
    rows: &[CostProfileRow],
    file_name: &str,
    periods: &ReportPeriods,
    target: &ExportTarget<'_>,
    console: &dyn Console,
) -> Option<String> {
    run_export(ExportFormat::Pdf, "cost report", file_name, target, console, |at| {
        pdf::render(&pdf::compose_cost(
            rows,
            &periods.previous,
            &periods.current,
            at,
        ))
    })
}

/// Export any serializable value as pretty-printed JSON.
pub fn export_json<T: Serialize + ?Sized>(
    data: &T,
    file_name: &str,
    target: &ExportTarget<'_>,
    console: &dyn Console,
) -> Option<String> {
    run_export(ExportFormat::Json, "data", file_name, target, console, |_| {
        json::encode_json(data)
    })
}

/// Stamp, encode, deliver, and report.
fn run_export(
    format: ExportFormat,
    what: &str,
    file_name: &str,
    target: &ExportTarget<'_>,
    console: &dyn Console,
    encode: impl FnOnce(NaiveDateTime) -> Result<Vec<u8>, ExportError>,
) -> Option<String> {
    let now = Local::now().naive_local();
    let stamped = format.file_name(file_name, now);

    let result = target
        .check()
        .and_then(|()| encode(now))
        .and_then(|content| sink::deliver(target, &stamped, &content, format));

    match result {
        Ok(delivered) => {
            if let Delivered::Remote(uri) = &delivered {
                console.success(&format!("Successfully exported to S3: {uri}"));
            }
            let location = delivered.location();
            tracing::info!(%format, what, location = %location, "export complete");
            Some(location)
        }
        Err(err) => {
            console.error(&format!("Error exporting {what} to {format}: {err}"));
            tracing::error!(%format, what, file = %stamped, error = %err, "export failed");
            None
        }
    }
}

#[cfg(test)]
mod tests;
