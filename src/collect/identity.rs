//! Identity resolution and per-run memoization.

use std::collections::HashMap;

use tracing::debug;

use crate::collect::config::CollectorConfig;
use crate::github::PullRequestSource;

/// Classification of a platform account, resolved once per identity so the
/// rest of the code compares structurally instead of by string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotKind {
    /// A regular human account.
    Human,
    /// The bot that authors dependency-flow merge commits.
    MergeBot,
    /// The bot that opens backport pull requests.
    BackportBot,
}

/// A resolved identity: stable login plus optional display name.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable login of the account.
    pub login: String,
    /// Display name; many accounts leave it unset.
    pub name: Option<String>,
    /// Bot classification of the account.
    pub kind: BotKind,
}

impl Identity {
    /// Returns the display name, falling back to the login when the name
    /// is absent or blank.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.login,
        }
    }
}

/// Memoizes identity lookups by login for the duration of one run.
///
/// Each login triggers at most one upstream call; entries are never
/// evicted. A failed lookup is cached as a login-only identity so reruns
/// within the same process do not retry the call.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: HashMap<String, Identity>,
}

impl IdentityCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identity for a login, fetching it on first use.
    ///
    /// Lookup failures are non-fatal: they are appended to `diagnostics`
    /// and the login itself serves as the display value.
    pub async fn get_user(
        &mut self,
        source: &dyn PullRequestSource,
        config: &CollectorConfig,
        login: &str,
        diagnostics: &mut Vec<String>,
    ) -> Identity {
        if let Some(identity) = self.entries.get(login) {
            return identity.clone();
        }

        debug!(login, "identity cache miss");
        let name = match source.get_user(login).await {
            Ok(user) => user.name,
            Err(e) => {
                debug!(login, error = %e, "identity lookup failed");
                diagnostics.push(format!("Could not retrieve user {login}."));
                None
            }
        };

        let identity = Identity {
            login: login.to_string(),
            name,
            kind: classify_login(config, login),
        };
        self.entries.insert(login.to_string(), identity.clone());
        identity
    }

    /// Number of cached identities, used by tests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn classify_login(config: &CollectorConfig, login: &str) -> BotKind {
    if login == config.merge_bot {
        BotKind::MergeBot
    } else if login == config.backport_bot {
        BotKind::BackportBot
    } else {
        BotKind::Human
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(login: &str, name: Option<&str>) -> Identity {
        Identity {
            login: login.to_string(),
            name: name.map(|n| n.to_string()),
            kind: BotKind::Human,
        }
    }

    #[test]
    fn display_name_prefers_name() {
        assert_eq!(identity("octo", Some("Octo Cat")).display_name(), "Octo Cat");
    }

    #[test]
    fn display_name_falls_back_to_login() {
        assert_eq!(identity("octo", None).display_name(), "octo");
    }

    #[test]
    fn display_name_treats_blank_as_absent() {
        assert_eq!(identity("octo", Some("   ")).display_name(), "octo");
    }

    #[test]
    fn classify_known_bots() {
        let config = CollectorConfig::new().unwrap();
        assert_eq!(classify_login(&config, &config.merge_bot), BotKind::MergeBot);
        assert_eq!(
            classify_login(&config, &config.backport_bot),
            BotKind::BackportBot
        );
        assert_eq!(classify_login(&config, "somebody"), BotKind::Human);
    }
}
