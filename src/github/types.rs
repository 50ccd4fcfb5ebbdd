//! Value types handed from the data source to the collector core.
//!
//! All of these are immutable once fetched; the resolver may fetch several
//! `PullRequestRef`s while attributing a single commit (original PR,
//! backport PR, nested backport PR).

use serde::{Deserialize, Serialize};

/// A commit as listed on a pull request timeline.
///
/// The message here is the pull-request copy of the commit message, which
/// can differ from the full message returned by [`CommitRef`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Full SHA-1 hash of the commit.
    pub sha: String,
    /// Commit message as attached to the pull request timeline.
    pub message: String,
    /// Permalink to the commit on the hosting platform.
    pub html_url: String,
}

/// A fully fetched commit with file list and author metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    /// Full SHA-1 hash of the commit.
    pub sha: String,
    /// Full (non-truncated) commit message.
    pub message: String,
    /// Login of the platform account that authored the commit, when the
    /// platform could map the git author to an account.
    pub author_login: Option<String>,
    /// Raw git author name recorded on the commit.
    pub author_name: String,
    /// Paths of the files changed by the commit.
    pub files: Vec<String>,
    /// Permalink to the commit on the hosting platform.
    pub html_url: String,
}

/// A pull request as fetched from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Pull request number.
    pub number: u64,
    /// Body text of the pull request description.
    pub body: String,
    /// Login of the account that created the pull request.
    pub creator: String,
    /// Login of the assignee, if one is set.
    pub assignee: Option<String>,
    /// Logins of the requested reviewers.
    pub requested_reviewers: Vec<String>,
    /// Whether the pull request is still open.
    pub open: bool,
}

/// A single review on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRef {
    /// Login of the reviewer.
    pub reviewer: String,
    /// Whether the review state is "approved".
    pub approved: bool,
}

/// A user profile as fetched from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    /// Stable login of the account.
    pub login: String,
    /// Display name, which many accounts leave unset.
    pub name: Option<String>,
}
