use anyhow::Result;
use clap::Parser;
use finops_export::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
