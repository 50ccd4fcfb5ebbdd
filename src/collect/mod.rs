//! Core of the servicing report: classification, attribution resolution
//! and the per-run orchestration that ties them together.

use anyhow::{Context, Result};
use tracing::debug;

pub mod classify;
pub mod config;
pub mod identity;
pub mod resolve;

pub use classify::{first_message_line, Classifier, Decision};
pub use config::CollectorConfig;
pub use identity::{BotKind, Identity, IdentityCache};
pub use resolve::{Approver, AuthorAndApprovers, Resolver, RunContext};

use crate::github::PullRequestSource;

/// One noteworthy commit, ready for rendering.
#[derive(Debug, Clone)]
pub struct IncludedCommit {
    /// Commit title with release tags and PR-number suffixes removed.
    pub title: String,
    /// Permalink to the commit.
    pub url: String,
    /// Number of the resolved originating pull request, when one was found.
    pub pr_number: Option<u64>,
    /// Display name of the resolved author.
    pub author: String,
    /// Approver display names, in resolution order.
    pub approvers: Vec<String>,
}

/// One commit judged to be noise.
#[derive(Debug, Clone)]
pub struct SkippedCommit {
    /// Why the commit was skipped.
    pub reason: String,
    /// First line of the commit message.
    pub title: String,
}

/// Output of one collector run.
#[derive(Debug, Default)]
pub struct CollectReport {
    /// Noteworthy commits, in pull-request listing order.
    pub included: Vec<IncludedCommit>,
    /// Noise commits, in pull-request listing order.
    pub skipped: Vec<SkippedCommit>,
    /// Resolution gaps encountered along the way.
    pub diagnostics: Vec<String>,
}

/// Iterates the commits of a release-branch merge PR, classifying each one
/// and resolving attribution for the noteworthy ones.
///
/// Processing is strictly sequential: one commit at a time, in listing
/// order, with blocking point-in-time lookups. The identity cache and the
/// diagnostics collector are scoped to a single run.
pub struct Collector<'a> {
    source: &'a dyn PullRequestSource,
    config: CollectorConfig,
}

impl<'a> Collector<'a> {
    /// Creates a collector with the default rule tables.
    pub fn new(source: &'a dyn PullRequestSource) -> Result<Self> {
        Ok(Self {
            source,
            config: CollectorConfig::new()?,
        })
    }

    /// Creates a collector with custom rule tables.
    pub fn with_config(source: &'a dyn PullRequestSource, config: CollectorConfig) -> Self {
        Self { source, config }
    }

    /// Builds the servicing report for one merge pull request.
    ///
    /// Only the initial commit listing is fatal; everything downstream
    /// degrades into diagnostics.
    pub async fn run(&self, org: &str, repo: &str, pr_number: u64) -> Result<CollectReport> {
        let commits = self
            .source
            .list_pull_request_commits(org, repo, pr_number)
            .await
            .with_context(|| format!("Failed to list commits of {org}/{repo}#{pr_number}"))?;

        debug!(count = commits.len(), "processing merge PR commits");

        let classifier = Classifier::new(&self.config);
        let resolver = Resolver::new(self.source, &self.config, org, repo);
        let mut ctx = RunContext::new();
        let mut report = CollectReport::default();

        for summary in commits {
            let detail = match self.source.get_commit(org, repo, &summary.sha).await {
                Ok(detail) => detail,
                Err(e) => {
                    debug!(sha = %summary.sha, error = %e, "commit detail fetch failed");
                    // Without the file list and author login neither
                    // verdict would be trustworthy; report the gap only.
                    ctx.diagnostics
                        .push(format!("Could not retrieve commit {}.", summary.sha));
                    continue;
                }
            };

            let first_line = first_message_line(&detail.message).to_string();
            match classifier.classify(&detail) {
                Decision::Skipped(reason) => {
                    report.skipped.push(SkippedCommit {
                        reason,
                        title: first_line,
                    });
                }
                Decision::Included => {
                    let (pr, people) = resolver.resolve(&mut ctx, &detail, &summary.message).await;
                    report.included.push(IncludedCommit {
                        title: classifier.trim_title(&first_line),
                        url: detail.html_url.clone(),
                        pr_number: pr.map(|p| p.number),
                        author: people.author.clone(),
                        approvers: people.approver_names(),
                    });
                }
            }
        }

        report.diagnostics = ctx.diagnostics;
        Ok(report)
    }
}
