//! # commit-collect
//!
//! Builds a servicing report for a release-branch merge pull request:
//! every commit merged from the staging branch is classified as noteworthy
//! or noise, and for noteworthy commits the tool recovers the real human
//! author and the people who approved the change, even when the visible
//! commit was created by an automation bot through one or two levels of
//! backport indirection.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod collect;
pub mod github;
pub mod render;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of commit-collect.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
