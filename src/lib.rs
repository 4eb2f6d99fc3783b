//! # finops-export
//!
//! Report export for the AWS FinOps dashboard: audit findings, per-profile
//! cost summaries and cost trends rendered as PDF, CSV or JSON and written
//! to a local directory or an S3 bucket.
//!
//! Every `export_*` operation is best-effort. It builds the artifact in
//! memory, writes it once, and returns the resulting path or `s3://` URI, or
//! `None` after reporting the failure through a [`Console`].
//!
//! ```no_run
//! use finops_export::{AuditRow, ExportTarget, Output, export_audit_report_to_csv};
//!
//! let rows = vec![AuditRow::new("dev", "123456789012")];
//! let console = Output::new(false, false);
//! let path = export_audit_report_to_csv(&rows, "audit", &ExportTarget::local(Some("reports")), &console);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod report;
pub mod storage;

pub use cli::{Cli, Console, Output, Silent};
pub use config::{ConfigMap, ExportSettings, load_config_file};
pub use error::{ConfigError, ExportError, StorageError};
pub use export::{
    ExportFormat, ExportTarget, ReportPeriods, export_audit_report_to_csv,
    export_audit_report_to_json, export_audit_report_to_pdf, export_cost_dashboard_to_pdf,
    export_json, export_trend_data_to_json, upload,
};
pub use report::{AuditRow, CostProfileRow, TrendRow};
pub use storage::{MemoryStore, ObjectStore, S3Session, StorageSession};

/// Result type alias for command plumbing
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
