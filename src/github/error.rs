//! GitHub API specific error handling.

use thiserror::Error;

/// Errors raised by the GitHub REST client.
#[derive(Error, Debug)]
pub enum GithubError {
    /// Network-level failure sending the request.
    #[error("GitHub request failed: {0}")]
    RequestFailed(String),

    /// The API answered with a non-success status.
    #[error("GitHub API returned {status} for {url}")]
    UnexpectedStatus {
        /// HTTP status code of the response.
        status: u16,
        /// Request URL that produced the response.
        url: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Invalid response from GitHub API: {0}")]
    InvalidResponse(String),
}

// Note: anyhow already has a blanket impl for thiserror::Error types
