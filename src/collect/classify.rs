//! Commit classification: decide whether a merged commit is noteworthy or
//! noise, with a user-facing reason for every skip.

use crate::collect::config::CollectorConfig;
use crate::github::CommitRef;

/// Number of pattern characters echoed in a "Skip title pattern" reason.
const PATTERN_REASON_LEN: usize = 19;

/// Outcome of classifying one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The commit belongs in the servicing report.
    Included,
    /// The commit is noise; the reason is shown to the user.
    Skipped(String),
}

/// Pure decision function over a commit's message and changed files.
#[derive(Debug)]
pub struct Classifier<'a> {
    config: &'a CollectorConfig,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier over the given rule tables.
    pub fn new(config: &'a CollectorConfig) -> Self {
        Self { config }
    }

    /// Classifies a commit. Rules are evaluated in order and the first
    /// match wins; the order is significant because the matched reason is
    /// reported to the user.
    pub fn classify(&self, commit: &CommitRef) -> Decision {
        let first_line = first_message_line(&commit.message);

        if commit.author_login.as_deref() == Some(self.config.merge_bot.as_str()) {
            return Decision::Skipped(format!("author: {}", self.config.merge_bot));
        }

        for text in &self.config.forbidden_strings {
            if first_line.contains(text.as_str()) {
                return Decision::Skipped(format!("Skip title text: {text}"));
            }
        }

        for pattern in &self.config.forbidden_patterns {
            if pattern.is_match(first_line) {
                let prefix: String = pattern.as_str().chars().take(PATTERN_REASON_LEN).collect();
                return Decision::Skipped(format!("Skip title pattern: {prefix}"));
            }
        }

        // An empty file list must not vacuously satisfy the "all files"
        // rules below; a commit with no file data stays included.
        if !commit.files.is_empty() {
            if commit.files.iter().all(|f| self.is_infra_file(f)) {
                return Decision::Skipped("All infra files".to_string());
            }

            if commit
                .files
                .iter()
                .all(|f| f.to_lowercase().contains("test"))
            {
                return Decision::Skipped("All test files".to_string());
            }
        }

        Decision::Included
    }

    fn is_infra_file(&self, path: &str) -> bool {
        let lowered = path.to_lowercase();
        self.config
            .infra_suffixes
            .iter()
            .any(|suffix| lowered.ends_with(&suffix.to_lowercase()))
    }

    /// Removes release-branch tags and PR-number suffixes from an included
    /// commit title before it is rendered.
    pub fn trim_title(&self, title: &str) -> String {
        let mut cleaned = title.to_string();

        for text in &self.config.trim_strings {
            cleaned = remove_ignore_case(&cleaned, text);
        }

        for pattern in &self.config.trim_patterns {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }

        cleaned
    }
}

/// Returns the first line of a commit message: the text up to but excluding
/// the first CR or LF, or the whole message if it has no newline.
pub fn first_message_line(message: &str) -> &str {
    message.split(['\r', '\n']).next().unwrap_or("").trim()
}

/// Removes every occurrence of `text` from `value`, ignoring ASCII case.
fn remove_ignore_case(value: &str, text: &str) -> String {
    if text.is_empty() {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    while !rest.is_empty() {
        if let Some(len) = prefix_len_ignore_case(rest, text) {
            rest = &rest[len..];
        } else if let Some(ch) = rest.chars().next() {
            result.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    result
}

/// Byte length of `needle` matched at the start of `haystack`, comparing
/// characters ASCII-case-insensitively.
fn prefix_len_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    for nc in needle.chars() {
        let (_, hc) = hay.next()?;
        if !hc.eq_ignore_ascii_case(&nc) {
            return None;
        }
    }
    Some(hay.next().map_or(haystack.len(), |(i, _)| i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(message: &str, author_login: Option<&str>, files: &[&str]) -> CommitRef {
        CommitRef {
            sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
            message: message.to_string(),
            author_login: author_login.map(|s| s.to_string()),
            author_name: "Test Author".to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
            html_url: "https://example.com/commit".to_string(),
        }
    }

    fn classify(commit: &CommitRef) -> Decision {
        let config = CollectorConfig::new().unwrap();
        Classifier::new(&config).classify(commit)
    }

    // --- first_message_line ---

    #[test]
    fn first_line_lf() {
        assert_eq!(first_message_line("title\nbody"), "title");
    }

    #[test]
    fn first_line_crlf() {
        assert_eq!(first_message_line("title\r\nbody"), "title");
    }

    #[test]
    fn first_line_no_newline() {
        assert_eq!(first_message_line("just a title"), "just a title");
    }

    // --- skip rules, in evaluation order ---

    #[test]
    fn merge_bot_author_always_skipped() {
        let c = commit(
            "Fix something real (#1)",
            Some("dotnet-maestro[bot]"),
            &["src/lib.rs"],
        );
        assert_eq!(
            classify(&c),
            Decision::Skipped("author: dotnet-maestro[bot]".to_string())
        );
    }

    #[test]
    fn forbidden_string_in_title() {
        let c = commit(
            "Update dependencies from dotnet/arcade",
            Some("human"),
            &["src/lib.rs"],
        );
        assert_eq!(
            classify(&c),
            Decision::Skipped("Skip title text: Update dependencies from ".to_string())
        );
    }

    #[test]
    fn forbidden_string_only_matches_first_line() {
        let c = commit(
            "Real change\n\nMerge branch leftovers in body",
            Some("human"),
            &["src/lib.rs"],
        );
        assert_eq!(classify(&c), Decision::Included);
    }

    #[test]
    fn forbidden_pattern_reports_prefix() {
        let c = commit(
            "Merge pull request #7 from dotnet/merge/release/8.0",
            Some("human"),
            &["src/lib.rs"],
        );
        assert_eq!(
            classify(&c),
            Decision::Skipped("Skip title pattern: Merge pull request ".to_string())
        );
    }

    #[test]
    fn all_infra_files_skipped() {
        let c = commit(
            "Update build bits",
            Some("human"),
            &["eng/Version.props", "global.JSON", "README.md"],
        );
        assert_eq!(classify(&c), Decision::Skipped("All infra files".to_string()));
    }

    #[test]
    fn all_test_files_skipped() {
        let c = commit(
            "Tweak coverage",
            Some("human"),
            &["src/Tests/One.cs", "other/testdata/two.bin"],
        );
        assert_eq!(classify(&c), Decision::Skipped("All test files".to_string()));
    }

    #[test]
    fn infra_rule_checked_before_test_rule() {
        // Every file matches both rules; the infra reason must win.
        let c = commit("Overlap", Some("human"), &["tests/config.json"]);
        assert_eq!(classify(&c), Decision::Skipped("All infra files".to_string()));
    }

    #[test]
    fn empty_file_list_is_not_skipped() {
        let c = commit("Detail fetch gave no files", Some("human"), &[]);
        assert_eq!(classify(&c), Decision::Included);
    }

    #[test]
    fn mixed_files_included() {
        let c = commit(
            "Fix null ref (#100)",
            Some("human"),
            &["src/lib.rs", "docs/notes.md"],
        );
        assert_eq!(classify(&c), Decision::Included);
    }

    // --- title trimming ---

    #[test]
    fn trim_release_tag_and_pr_suffix() {
        let config = CollectorConfig::new().unwrap();
        let classifier = Classifier::new(&config);
        assert_eq!(
            classifier.trim_title("[release/8.0] Fix null ref (#100)"),
            "Fix null ref"
        );
    }

    #[test]
    fn trim_is_case_insensitive() {
        let config = CollectorConfig::new().unwrap();
        let classifier = Classifier::new(&config);
        assert_eq!(
            classifier.trim_title("[RELEASE/9.0] Harden parser (#42)"),
            "Harden parser"
        );
    }

    #[test]
    fn trim_leaves_plain_title_alone() {
        let config = CollectorConfig::new().unwrap();
        let classifier = Classifier::new(&config);
        assert_eq!(classifier.trim_title("Plain title"), "Plain title");
    }

    // --- remove_ignore_case ---

    #[test]
    fn remove_ignore_case_multiple_hits() {
        assert_eq!(remove_ignore_case("aXbxc", "x"), "abc");
    }

    #[test]
    fn remove_ignore_case_no_hit() {
        assert_eq!(remove_ignore_case("abc", "z"), "abc");
    }

    #[test]
    fn remove_ignore_case_survives_non_ascii() {
        assert_eq!(remove_ignore_case("naïve [tag] fix", "[tag] "), "naïve fix");
    }
}
