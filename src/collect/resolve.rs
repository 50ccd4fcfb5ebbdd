//! Attribution resolution: recover the human author and the approver set
//! behind a commit, following backport chains through pull-request
//! metadata.
//!
//! Bot-created backport commits hide the real author one or two pull
//! requests away. Resolution starts from the PR number embedded in the
//! commit title, merges people from that PR, and unwinds backport
//! wrappers until a human author settles or the hop cap is reached.
//! Expected absence of data (no PR number, failed fetch) never fails the
//! run; it is recorded as a diagnostic and the best partial result is
//! returned.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::collect::classify::first_message_line;
use crate::collect::config::CollectorConfig;
use crate::collect::identity::{BotKind, IdentityCache};
use crate::github::{CommitRef, PullRequestRef, PullRequestSource};

/// Number of hex characters shown when a sha is echoed in a diagnostic.
pub const SHORT_SHA_LEN: usize = 8;

/// Hops followed past the initially fetched PR before giving up on a
/// backport chain.
const MAX_BACKPORT_HOPS: usize = 2;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static TITLE_PR_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(#(\d+)\)").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static BODY_PR_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\d+)").unwrap());

/// Mutable per-run state shared by the resolver and the orchestrator:
/// the identity cache and the diagnostics collector.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Memoized identity lookups for this run.
    pub cache: IdentityCache,
    /// Resolution gaps gathered across the run, surfaced at the end.
    pub diagnostics: Vec<String>,
}

impl RunContext {
    /// Creates an empty run context.
    pub fn new() -> Self {
        Self::default()
    }
}

/// An approver entry: login is the unique key, name is what gets rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approver {
    /// Stable login of the approver.
    pub login: String,
    /// Display name of the approver.
    pub name: String,
}

/// The author and approver set resolved for one commit.
///
/// The author starts as the raw git author name of the commit and is
/// replaced once a better candidate is found in pull-request metadata.
/// Invariant: the settled author's login never appears as an approver key.
#[derive(Debug, Clone)]
pub struct AuthorAndApprovers {
    /// Display name of the resolved author.
    pub author: String,
    author_login: Option<String>,
    approvers: Vec<Approver>,
}

impl AuthorAndApprovers {
    fn new(raw_author_name: &str) -> Self {
        Self {
            author: raw_author_name.to_string(),
            author_login: None,
            approvers: Vec::new(),
        }
    }

    /// Approvers in insertion order.
    pub fn approvers(&self) -> &[Approver] {
        &self.approvers
    }

    /// Approver display names in insertion order.
    pub fn approver_names(&self) -> Vec<String> {
        self.approvers.iter().map(|a| a.name.clone()).collect()
    }

    fn is_approver(&self, login: &str) -> bool {
        self.approvers.iter().any(|a| a.login == login)
    }

    fn is_author_login(&self, login: &str) -> bool {
        self.author_login.as_deref() == Some(login)
    }

    fn set_author(&mut self, login: &str, name: String) {
        self.author = name;
        self.author_login = Some(login.to_string());
        // A candidate confirmed as the author can already sit in the
        // approver set (inserted as creator or reviewer); drop it there.
        self.approvers.retain(|a| a.login != login);
    }

    fn add_approver(&mut self, login: String, name: String) {
        if !self.is_approver(&login) {
            self.approvers.push(Approver { login, name });
        }
    }
}

/// Finds a `(#N)` reference in a commit title or message.
pub fn find_title_pr_number(text: &str) -> Option<u64> {
    TITLE_PR_NUMBER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Finds a loose `#N` back-reference in free-form PR body text.
///
/// False negatives are expected here, not exceptional; bodies frequently
/// carry no reference at all.
pub fn find_body_pr_number(text: &str) -> Option<u64> {
    BODY_PR_NUMBER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn short_sha(sha: &str) -> &str {
    &sha[..sha.len().min(SHORT_SHA_LEN)]
}

/// Resolves author and approvers for included commits.
pub struct Resolver<'a> {
    source: &'a dyn PullRequestSource,
    config: &'a CollectorConfig,
    org: &'a str,
    repo: &'a str,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver bound to one repository.
    pub fn new(
        source: &'a dyn PullRequestSource,
        config: &'a CollectorConfig,
        org: &'a str,
        repo: &'a str,
    ) -> Self {
        Self {
            source,
            config,
            org,
            repo,
        }
    }

    /// Resolves the originating pull request and the people behind a
    /// commit. Always returns a usable (possibly partial) result; gaps go
    /// into the run context's diagnostics.
    pub async fn resolve(
        &self,
        ctx: &mut RunContext,
        commit: &CommitRef,
        pr_commit_message: &str,
    ) -> (Option<PullRequestRef>, AuthorAndApprovers) {
        let mut people = AuthorAndApprovers::new(&commit.author_name);

        // The PR timeline copy of the message is checked first; squash
        // merges sometimes keep the (#N) suffix only there.
        let number = find_title_pr_number(pr_commit_message)
            .or_else(|| find_title_pr_number(&commit.message));
        let Some(number) = number else {
            ctx.diagnostics.push(format!(
                "{} - {} - No PR number found in the commit title.",
                short_sha(&commit.sha),
                first_message_line(&commit.message)
            ));
            return (None, people);
        };

        let pr = match self.source.get_pull_request(self.org, self.repo, number).await {
            Ok(pr) => pr,
            Err(e) => {
                debug!(number, error = %e, "pull request fetch failed");
                ctx.diagnostics
                    .push(format!("Could not retrieve PR for pr number {number}."));
                return (None, people);
            }
        };

        self.add_people(ctx, &mut people, &pr).await;

        // Backport unwinding: an explicit loop with a hop counter, so the
        // termination guarantee is auditable.
        let mut resolved = pr;
        let mut hops = 0;
        loop {
            let is_backport_wrapper = if hops == 0 {
                // No candidate on the fetched PR displaced the bot as
                // author, meaning the underlying commit was bot-created.
                self.author_is_unsettled(&people)
            } else {
                resolved.creator == self.config.backport_bot
            };

            if !is_backport_wrapper {
                break;
            }

            if hops == MAX_BACKPORT_HOPS {
                ctx.diagnostics.push(format!(
                    "{} - backport chain behind PR {} is deeper than {} hops and was not fully unwound.",
                    short_sha(&commit.sha),
                    resolved.number,
                    MAX_BACKPORT_HOPS
                ));
                break;
            }

            let Some(next_number) = find_body_pr_number(&resolved.body) else {
                ctx.diagnostics.push(format!(
                    "{} - {} - Did not find 'Backport of' text in PR body.",
                    short_sha(&commit.sha),
                    first_message_line(&commit.message)
                ));
                break;
            };

            let next = match self
                .source
                .get_pull_request(self.org, self.repo, next_number)
                .await
            {
                Ok(pr) => pr,
                Err(e) => {
                    debug!(number = next_number, error = %e, "backport fetch failed");
                    ctx.diagnostics
                        .push(format!("Could not retrieve PR for pr number {next_number}."));
                    // Keep the wrapper PR as the reference.
                    break;
                }
            };

            self.add_people(ctx, &mut people, &next).await;
            resolved = next;
            hops += 1;
        }

        (Some(resolved), people)
    }

    /// The author slot is still open when it is empty or still holds the
    /// backport bot: its login is the raw git author name of bot-created
    /// commits, and `add_people` never installs the bot as a person.
    fn author_is_unsettled(&self, people: &AuthorAndApprovers) -> bool {
        people.author.is_empty() || people.author == self.config.backport_bot
    }

    /// Merges candidate identities from a PR into `people`, in fixed
    /// order: creator, assignee, requested reviewers, approving reviewers.
    /// The first qualifying candidate claims the author slot; everyone
    /// else with a distinct name becomes an approver.
    async fn add_people(
        &self,
        ctx: &mut RunContext,
        people: &mut AuthorAndApprovers,
        pr: &PullRequestRef,
    ) {
        let mut candidates: Vec<String> = vec![pr.creator.clone()];

        if let Some(assignee) = &pr.assignee {
            candidates.push(assignee.clone());
        }

        for login in &pr.requested_reviewers {
            if !people.is_approver(login) {
                candidates.push(login.clone());
            }
        }

        match self.source.list_reviews(self.org, self.repo, pr.number).await {
            Ok(reviews) => {
                // A reviewer can review several times; only the latest
                // state counts.
                let mut latest: Vec<(String, bool)> = Vec::new();
                for review in reviews {
                    match latest.iter_mut().find(|(login, _)| *login == review.reviewer) {
                        Some(entry) => entry.1 = review.approved,
                        None => latest.push((review.reviewer, review.approved)),
                    }
                }
                for (login, approved) in latest {
                    if approved && !people.is_approver(&login) {
                        candidates.push(login);
                    }
                }
            }
            Err(e) => {
                debug!(number = pr.number, error = %e, "review listing failed");
                ctx.diagnostics.push(format!(
                    "Could not retrieve reviews for pr number {}.",
                    pr.number
                ));
            }
        }

        for login in candidates {
            let identity = ctx
                .cache
                .get_user(self.source, self.config, &login, &mut ctx.diagnostics)
                .await;

            // The backport bot is never reported as a person.
            if identity.kind == BotKind::BackportBot {
                continue;
            }

            let name = identity.display_name().to_string();
            if self.author_is_unsettled(people) {
                people.set_author(&login, name);
            } else if name != people.author
                && !people.is_author_login(&login)
                && !people.is_approver(&login)
            {
                people.add_approver(login, name);
            }
        }
    }
}
