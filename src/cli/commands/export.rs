//! `audit`, `cost` and `trend`: read rows from JSON and export them.

use crate::cli::Output;
use crate::config::ExportSettings;
use crate::export::{
    ExportFormat, ExportTarget, ReportPeriods, export_audit_report_to_csv,
    export_audit_report_to_json, export_audit_report_to_pdf, export_cost_dashboard_to_pdf,
    export_json, export_trend_data_to_json,
};
use crate::report::{AuditRow, CostProfileRow, TrendRow};
use crate::storage::{S3Session, StorageSession};
use anyhow::{Context, Result, bail};
use clap::Args;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Where exports go, shared by every export command.
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Base file name; a `_YYYYMMDD_HHMM` stamp and extension are appended
    #[arg(short, long)]
    pub name: Option<String>,

    /// Local output directory (created if missing)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Upload to this S3 bucket instead of writing locally
    #[arg(long)]
    pub bucket: Option<String>,

    /// Key prefix inside the bucket
    #[arg(long)]
    pub prefix: Option<String>,

    /// AWS profile used for the upload session
    #[arg(long, value_name = "PROFILE")]
    pub aws_profile: Option<String>,

    /// AWS region used for the upload session
    #[arg(long)]
    pub region: Option<String>,
}

/// Flags merged over config-file settings.
struct Resolved {
    name: String,
    dir: Option<PathBuf>,
    bucket: Option<String>,
    prefix: Option<String>,
    session: Option<S3Session>,
}

impl TargetArgs {
    fn resolve(self, settings: &ExportSettings, default_name: &str) -> Result<Resolved> {
        let name = self
            .name
            .or_else(|| settings.report_name.clone())
            .unwrap_or_else(|| default_name.to_string());
        let bucket = self.bucket.or_else(|| settings.s3_bucket.clone());

        let session = match &bucket {
            Some(bucket) => {
                let profile = self.aws_profile.or_else(|| settings.aws_profile.clone());
                let region = self.region.or_else(|| settings.region.clone());
                let session = S3Session::new(profile.as_deref(), region.as_deref())
                    .with_context(|| format!("could not open an S3 session for bucket {bucket}"))?;
                Some(session)
            }
            None => None,
        };

        Ok(Resolved {
            name,
            dir: self.dir.or_else(|| settings.dir.as_ref().map(PathBuf::from)),
            prefix: self.prefix.or_else(|| settings.s3_prefix.clone()),
            bucket,
            session,
        })
    }
}

impl Resolved {
    fn describe(&self) -> String {
        match (&self.bucket, &self.dir) {
            (Some(bucket), _) => match self.prefix.as_deref().map(|p| p.trim_matches('/')) {
                Some(prefix) if !prefix.is_empty() => format!("s3://{bucket}/{prefix}/"),
                _ => format!("s3://{bucket}/"),
            },
            (None, Some(dir)) => dir.display().to_string(),
            (None, None) => "current directory".to_string(),
        }
    }

    fn target(&self) -> ExportTarget<'_> {
        match &self.bucket {
            Some(bucket) => ExportTarget::object_store(
                bucket.as_str(),
                self.prefix.as_deref(),
                self.session.as_ref().map(|s| s as &dyn StorageSession),
            ),
            None => ExportTarget::local(self.dir.as_deref()),
        }
    }
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// JSON file holding an array of audit rows
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Formats to write (default: csv)
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<ExportFormat>,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct CostArgs {
    /// JSON file holding an array of per-profile cost rows
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Formats to write, pdf or json (default: pdf)
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<ExportFormat>,

    /// Label of the previous billing period
    #[arg(long, value_name = "LABEL", default_value = "N/A")]
    pub previous_period: String,

    /// Label of the current billing period
    #[arg(long, value_name = "LABEL", default_value = "N/A")]
    pub current_period: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct TrendArgs {
    /// JSON file holding an array of trend records
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn audit(args: AuditArgs, settings: &ExportSettings, output: &Output) -> Result<()> {
    let rows: Vec<AuditRow> = read_rows(&args.input)?;
    let formats = select_formats(
        &args.format,
        settings,
        &[ExportFormat::Pdf, ExportFormat::Csv, ExportFormat::Json],
        ExportFormat::Csv,
        output,
    )?;
    let resolved = args.target.resolve(settings, "audit_report")?;
    let target = resolved.target();

    output.header("Audit report");
    output.count("📋", "Audit rows loaded", rows.len());
    output.info(&format!("Exporting to {}", resolved.describe()));

    let results = formats
        .into_iter()
        .map(|format| {
            let location = match format {
                ExportFormat::Pdf => {
                    export_audit_report_to_pdf(&rows, &resolved.name, &target, output)
                }
                ExportFormat::Csv => {
                    export_audit_report_to_csv(&rows, &resolved.name, &target, output)
                }
                ExportFormat::Json => {
                    export_audit_report_to_json(&rows, &resolved.name, &target, output)
                }
            };
            (format, location)
        })
        .collect();
    report_results(output, results)
}

pub fn cost(args: CostArgs, settings: &ExportSettings, output: &Output) -> Result<()> {
    let rows: Vec<CostProfileRow> = read_rows(&args.input)?;
    let formats = select_formats(
        &args.format,
        settings,
        &[ExportFormat::Pdf, ExportFormat::Json],
        ExportFormat::Pdf,
        output,
    )?;
    let periods = ReportPeriods::new(args.previous_period, args.current_period);
    let resolved = args.target.resolve(settings, "cost_report")?;
    let target = resolved.target();

    output.header("Cost report");
    output.count("💰", "Profiles loaded", rows.len());
    output.info(&format!("Exporting to {}", resolved.describe()));

    let results = formats
        .into_iter()
        .map(|format| {
            let location = match format {
                ExportFormat::Json => export_json(&rows, &resolved.name, &target, output),
                _ => export_cost_dashboard_to_pdf(
                    &rows,
                    &resolved.name,
                    &periods,
                    &target,
                    output,
                ),
            };
            (format, location)
        })
        .collect();
    report_results(output, results)
}

pub fn trend(args: TrendArgs, settings: &ExportSettings, output: &Output) -> Result<()> {
    let rows: Vec<TrendRow> = read_rows(&args.input)?;
    let resolved = args.target.resolve(settings, "trend_data")?;
    let target = resolved.target();

    output.header("Trend data");
    output.count("📈", "Trend records loaded", rows.len());
    output.info(&format!("Exporting to {}", resolved.describe()));

    let location = export_trend_data_to_json(&rows, &resolved.name, &target, output);
    report_results(output, vec![(ExportFormat::Json, location)])
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rows from {}", path.display()))
}

/// Formats from the flag, else from config, else `default`.
///
/// Flags naming a format the report can't produce are an error; the same
/// thing in a config file (shared between reports) is skipped.
fn select_formats(
    requested: &[ExportFormat],
    settings: &ExportSettings,
    supported: &[ExportFormat],
    default: ExportFormat,
    output: &Output,
) -> Result<Vec<ExportFormat>> {
    if let Some(format) = requested.iter().find(|f| !supported.contains(*f)) {
        bail!("{format} export is not available for this report");
    }

    let candidates: Vec<ExportFormat> = if requested.is_empty() {
        settings
            .report_types
            .iter()
            .copied()
            .filter(|format| {
                let ok = supported.contains(format);
                if !ok {
                    output.verbose(&format!("Skipping {format}: not available for this report"));
                }
                ok
            })
            .collect()
    } else {
        requested.to_vec()
    };

    let mut formats = Vec::new();
    for format in candidates {
        if !formats.contains(&format) {
            formats.push(format);
        }
    }

    if formats.is_empty() {
        formats.push(default);
    }
    Ok(formats)
}

fn report_results(output: &Output, results: Vec<(ExportFormat, Option<String>)>) -> Result<()> {
    let failed: Vec<String> = results
        .iter()
        .filter(|(_, location)| location.is_none())
        .map(|(format, _)| format.to_string())
        .collect();

    for (format, location) in &results {
        if let Some(location) = location {
            output.artifact(&format.to_string(), location);
        }
    }

    if !failed.is_empty() {
        bail!("{} export(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}
