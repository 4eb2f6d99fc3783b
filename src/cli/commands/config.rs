//! `config show`: load a config file and print it as JSON.

use crate::cli::Output;
use crate::config::{ExportSettings, highlight_json, load_config_file};
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Load a TOML, YAML or JSON file and print the decoded mapping
    Show {
        /// Configuration file to load
        file: PathBuf,
    },
}

pub fn execute(args: ConfigArgs, output: &Output) -> Result<()> {
    match args.command {
        ConfigCommand::Show { file } => show(file, output),
    }
}

fn show(file: PathBuf, output: &Output) -> Result<()> {
    let Some(map) = load_config_file(&file, output) else {
        bail!("could not load configuration from {}", file.display());
    };

    let rendered = serde_json::to_string_pretty(&map)?;
    println!("{}", highlight_json(&rendered));

    let settings = ExportSettings::from_map(&map);
    output.verbose(&format!("Export settings: {settings:?}"));
    Ok(())
}
