//! Output formats and their content types.

use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

/// Encoder selected for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        content_type_for_extension(self.extension())
    }

    /// Stamp `base` as `<base>_<YYYYMMDD_HHMM>.<ext>`.
    pub fn file_name(self, base: &str, at: NaiveDateTime) -> String {
        format!("{}_{}.{}", base, at.format("%Y%m%d_%H%M"), self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Pdf => "PDF",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown report type '{other}' (expected pdf, csv or json)")),
        }
    }
}

/// Returns the content type for a given file extension.
///
/// Mappings:
/// - `.pdf` -> `application/pdf`
/// - `.csv` -> `text/csv`
/// - `.json` -> `application/json`
/// - default -> `application/octet-stream`
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Returns the content type for an object key based on its extension.
pub fn content_type_for_key(key: &str) -> &'static str {
    std::path::Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(content_type_for_extension)
        .unwrap_or("application/octet-stream")
}
