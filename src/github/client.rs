//! GitHub REST API client implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::github::error::GithubError;
use crate::github::types::{CommitRef, CommitSummary, PullRequestRef, ReviewRef, UserRef};
use crate::github::PullRequestSource;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// Wire shape of an account reference.
#[derive(Deserialize)]
struct WireUser {
    login: String,
    name: Option<String>,
}

/// Wire shape of the nested git author on a commit object.
#[derive(Deserialize)]
struct WireGitAuthor {
    name: Option<String>,
}

/// Wire shape of the nested `commit` object.
#[derive(Deserialize)]
struct WireGitCommit {
    message: String,
    author: Option<WireGitAuthor>,
}

/// Wire shape of a commit, both in PR listings and in detail form.
#[derive(Deserialize)]
struct WireCommit {
    sha: String,
    commit: WireGitCommit,
    author: Option<WireUser>,
    html_url: String,
    #[serde(default)]
    files: Vec<WireFile>,
}

#[derive(Deserialize)]
struct WireFile {
    filename: String,
}

#[derive(Deserialize)]
struct WirePullRequest {
    number: u64,
    body: Option<String>,
    user: WireUser,
    assignee: Option<WireUser>,
    #[serde(default)]
    requested_reviewers: Vec<WireUser>,
    state: String,
}

#[derive(Deserialize)]
struct WireReview {
    user: Option<WireUser>,
    state: String,
}

/// GitHub REST v3 client.
///
/// The caller provides a pre-acquired access token; interactive credential
/// flows are out of scope here.
pub struct GithubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GithubClient {
    /// Creates a client against the public GitHub API.
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, DEFAULT_API_URL.to_string())
    }

    /// Creates a client against a custom API root, used by tests.
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Sends an authenticated GET request and decodes the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GithubError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GitHub API request");

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {}", self.token))
            .header("accept", "application/vnd.github+json")
            .header("user-agent", concat!("commit-collect/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| GithubError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GithubError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PullRequestSource for GithubClient {
    async fn list_pull_request_commits(
        &self,
        org: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<CommitSummary>, GithubError> {
        // 100 is the API page-size ceiling; release merges stay well below it.
        let path = format!("/repos/{org}/{repo}/pulls/{pr_number}/commits?per_page=100");
        let commits: Vec<WireCommit> = self.get_json(&path).await?;

        Ok(commits
            .into_iter()
            .map(|c| CommitSummary {
                sha: c.sha,
                message: c.commit.message,
                html_url: c.html_url,
            })
            .collect())
    }

    async fn get_commit(
        &self,
        org: &str,
        repo: &str,
        sha: &str,
    ) -> Result<CommitRef, GithubError> {
        let path = format!("/repos/{org}/{repo}/commits/{sha}");
        let commit: WireCommit = self.get_json(&path).await?;

        Ok(CommitRef {
            sha: commit.sha,
            message: commit.commit.message,
            author_login: commit.author.map(|a| a.login),
            author_name: commit
                .commit
                .author
                .and_then(|a| a.name)
                .unwrap_or_default(),
            files: commit.files.into_iter().map(|f| f.filename).collect(),
            html_url: commit.html_url,
        })
    }

    async fn get_pull_request(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestRef, GithubError> {
        let path = format!("/repos/{org}/{repo}/pulls/{number}");
        let pr: WirePullRequest = self.get_json(&path).await?;

        Ok(PullRequestRef {
            number: pr.number,
            body: pr.body.unwrap_or_default(),
            creator: pr.user.login,
            assignee: pr.assignee.map(|a| a.login),
            requested_reviewers: pr
                .requested_reviewers
                .into_iter()
                .map(|r| r.login)
                .collect(),
            open: pr.state == "open",
        })
    }

    async fn list_reviews(
        &self,
        org: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<ReviewRef>, GithubError> {
        let path = format!("/repos/{org}/{repo}/pulls/{pr_number}/reviews?per_page=100");
        let reviews: Vec<WireReview> = self.get_json(&path).await?;

        Ok(reviews
            .into_iter()
            .filter_map(|r| {
                r.user.map(|u| ReviewRef {
                    reviewer: u.login,
                    approved: r.state == "APPROVED",
                })
            })
            .collect())
    }

    async fn get_user(&self, login: &str) -> Result<UserRef, GithubError> {
        let path = format!("/users/{login}");
        let user: WireUser = self.get_json(&path).await?;

        Ok(UserRef {
            login: user.login,
            name: user.name,
        })
    }
}
