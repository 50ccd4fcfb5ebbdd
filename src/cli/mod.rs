//! CLI interface for commit-collect

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod report;

/// commit-collect: servicing report generator for release-branch merges
#[derive(Parser)]
#[command(name = "commit-collect")]
#[command(about = "Servicing report generator for release-branch merge pull requests", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories
#[derive(Subcommand)]
pub enum Commands {
    /// Build the servicing report for a merge pull request
    Report(report::ReportCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Report(report_cmd) => report_cmd.execute().await,
        }
    }
}
