//! Settings and token resolution.
//!
//! The GitHub access token comes from the GITHUB_TOKEN environment
//! variable, with $HOME/.commit-collect/settings.json as a fallback.
//! Acquiring the token in the first place (device flow, gh auth, PAT
//! creation) is out of scope; the tool only consumes a pre-acquired one.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable checked before the settings file.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Settings loaded from $HOME/.commit-collect/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// GitHub access token.
    #[serde(default)]
    pub token: Option<String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default settings
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".commit-collect").join("settings.json"))
    }
}

/// Returns the GitHub token from the environment, falling back to the
/// settings file.
pub fn resolve_token() -> Result<String> {
    if let Ok(token) = env::var(TOKEN_ENV_VAR) {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    let settings = Settings::load()?;
    settings.token.filter(|t| !t.is_empty()).with_context(|| {
        format!(
            "GitHub token not found. Set {TOKEN_ENV_VAR} or add \"token\" to the settings file"
        )
    })
}
