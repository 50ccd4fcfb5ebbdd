//! Report command — builds the servicing report for one merge PR.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::collect::Collector;
use crate::github::GithubClient;
use crate::render;
use crate::utils::settings;

/// Report command options.
#[derive(Parser)]
pub struct ReportCommand {
    /// Organization that owns the repository.
    #[arg(long, default_value = "dotnet")]
    pub org: String,

    /// Repository name.
    #[arg(long, default_value = "runtime")]
    pub repo: String,

    /// Number of the PR with the manual merge from staging to base.
    #[arg(long, value_name = "NUMBER")]
    pub pr: u64,
}

impl ReportCommand {
    /// Executes the report command.
    pub async fn execute(self) -> Result<()> {
        let token = settings::resolve_token()?;
        let client = GithubClient::new(token);

        debug!(org = %self.org, repo = %self.repo, pr = self.pr, "collecting merge PR commits");

        let collector = Collector::new(&client).context("Failed to build rule tables")?;
        let report = collector.run(&self.org, &self.repo, self.pr).await?;

        render::print_report(&report)
    }
}
