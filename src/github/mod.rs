//! GitHub data source: wire types, REST client and the trait the
//! collector core consumes.

use async_trait::async_trait;

pub mod client;
pub mod error;
pub mod types;

pub use client::GithubClient;
pub use error::GithubError;
pub use types::{CommitRef, CommitSummary, PullRequestRef, ReviewRef, UserRef};

/// Read-only pull-request/commit data source.
///
/// The collector core talks to the hosting platform exclusively through
/// this trait; tests substitute an in-memory implementation.
#[async_trait]
pub trait PullRequestSource {
    /// Lists the commits of a pull request, in the order the platform
    /// reports them. That order defines the report order.
    async fn list_pull_request_commits(
        &self,
        org: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<CommitSummary>, GithubError>;

    /// Fetches a single commit with its changed-file list and author login.
    async fn get_commit(
        &self,
        org: &str,
        repo: &str,
        sha: &str,
    ) -> Result<CommitRef, GithubError>;

    /// Fetches a pull request by number.
    async fn get_pull_request(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestRef, GithubError>;

    /// Lists the reviews of a pull request.
    async fn list_reviews(
        &self,
        org: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<ReviewRef>, GithubError>;

    /// Fetches a user profile by login.
    async fn get_user(&self, login: &str) -> Result<UserRef, GithubError>;
}
