//! glosstip command-line entry point

use anyhow::Result;
use clap::Parser;
use glosstip_cli::commands::Commands;

/// Add glossary tooltips to HTML files
#[derive(Debug, Parser)]
#[command(name = "glosstip", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
