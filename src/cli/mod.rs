//! Command-line interface for finops-export
//!
//! Parses arguments with clap, installs logging, loads the optional config
//! file and dispatches to one of the subcommands in [`commands`].

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod commands;
pub mod output;

pub use output::{Console, Output, Silent};

use crate::config::{ExportSettings, load_config_file};

/// Export AWS FinOps audit, cost and trend reports
#[derive(Parser)]
#[command(name = "finops-export", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Export audit findings as PDF, CSV and/or JSON
    Audit(commands::export::AuditArgs),
    /// Export per-profile cost summaries as PDF and/or JSON
    Cost(commands::export::CostArgs),
    /// Export cost trend data as JSON
    Trend(commands::export::TrendArgs),
    /// Inspect configuration files
    Config(commands::config::ConfigArgs),
}

impl Cli {
    /// Run the parsed command
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Commands::Audit(args) => {
                let settings = load_settings(self.config.as_deref(), &output)?;
                commands::export::audit(args, &settings, &output)
            }
            Commands::Cost(args) => {
                let settings = load_settings(self.config.as_deref(), &output)?;
                commands::export::cost(args, &settings, &output)
            }
            Commands::Trend(args) => {
                let settings = load_settings(self.config.as_deref(), &output)?;
                commands::export::trend(args, &settings, &output)
            }
            Commands::Config(args) => commands::config::execute(args, &output),
        }
    }
}

/// Export settings from `--config`, or defaults when none was given.
fn load_settings(path: Option<&Path>, output: &Output) -> Result<ExportSettings> {
    let Some(path) = path else {
        return Ok(ExportSettings::default());
    };
    match load_config_file(path, output) {
        Some(map) => Ok(ExportSettings::from_map(&map)),
        None => bail!("could not load configuration from {}", path.display()),
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,aws_config=warn,aws_smithy_runtime=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,aws_config=info,aws_smithy_runtime=info,hyper=info"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
