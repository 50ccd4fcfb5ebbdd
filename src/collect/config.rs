//! Classification and attribution rule tables.

use anyhow::{Context, Result};
use regex::Regex;

/// Rule tables driving commit classification and title cleanup.
///
/// The defaults mirror the servicing workflow of the dotnet/runtime release
/// branches; every table can be replaced when building the collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Login of the bot that authors dependency-flow merge commits.
    /// Commits authored by this account are always noise.
    pub merge_bot: String,
    /// Login of the bot that opens backport pull requests on behalf of the
    /// original author.
    pub backport_bot: String,
    /// Literal substrings that mark a commit title as noise (case-sensitive).
    pub forbidden_strings: Vec<String>,
    /// Compiled patterns that mark a commit title as noise.
    pub forbidden_patterns: Vec<Regex>,
    /// Path suffixes of infrastructure files (matched case-insensitively).
    pub infra_suffixes: Vec<String>,
    /// Literal substrings removed from included titles before rendering
    /// (matched case-insensitively).
    pub trim_strings: Vec<String>,
    /// Compiled patterns removed from included titles before rendering.
    pub trim_patterns: Vec<Regex>,
}

impl CollectorConfig {
    /// Builds the default rule tables.
    pub fn new() -> Result<Self> {
        let forbidden_patterns =
            compile_all(&[r"Merge pull request (dotnet)?\#\d+ from dotnet/merge/release/"])?;
        let trim_patterns = compile_all(&[r"(?i)[ ]*\(\#\d+\)", r"(?i)\[\d+\.0\] "])?;

        Ok(Self {
            merge_bot: "dotnet-maestro[bot]".to_string(),
            backport_bot: "github-actions[bot]".to_string(),
            forbidden_strings: to_strings(&["Update dependencies from ", "Merge branch "]),
            forbidden_patterns,
            infra_suffixes: to_strings(&[
                "CMakeLists.txt",
                ".cmake",
                ".config",
                ".csproj",
                ".editorconfig",
                ".gitignore",
                ".ilproj",
                ".json",
                ".md",
                ".pp",
                ".proj",
                ".props",
                ".ps1",
                ".ruleset",
                ".sln",
                ".targets",
                ".txt",
                ".xml",
                ".yml",
            ]),
            trim_strings: to_strings(&[
                "[release/8.0] ",
                "[release/9.0] ",
                "[release/8.0-staging] ",
                "[release/9.0-staging] ",
            ]),
            trim_patterns,
        })
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("Invalid rule pattern: {p}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_compiles() {
        let config = CollectorConfig::new().unwrap();
        assert!(!config.forbidden_strings.is_empty());
        assert!(!config.forbidden_patterns.is_empty());
        assert!(!config.infra_suffixes.is_empty());
    }

    #[test]
    fn default_bots_are_distinct() {
        let config = CollectorConfig::new().unwrap();
        assert_ne!(config.merge_bot, config.backport_bot);
    }

    #[test]
    fn trim_patterns_are_case_insensitive() {
        let config = CollectorConfig::new().unwrap();
        assert!(config.trim_patterns[0].is_match(" (#123)"));
    }
}
