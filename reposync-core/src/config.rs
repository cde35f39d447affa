//! Configuration management for reposync
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (REPOSYNC_*)
//! 3. Config file (~/.config/reposync/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Path to the git executable
    pub git_path: String,

    /// Path to the ping executable used for the connectivity probe
    pub ping_path: String,

    /// Number of echo requests sent by the connectivity probe
    pub probe_count: u32,

    /// Branch checked out by the reset sequence before every scoped command
    pub baseline_branch: String,

    /// Git verb used to create a missing working copy
    pub clone_action: String,

    /// When set, reset and remove leave working copies untouched
    pub debug_mode: bool,

    /// Directory holding working copies when no destination is given
    pub workspace_root: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            git_path: "git".to_string(),
            ping_path: "ping".to_string(),
            probe_count: 4,
            baseline_branch: "master".to_string(),
            clone_action: "clone".to_string(),
            debug_mode: false,
            workspace_root: None,
        }
    }
}

impl SyncConfig {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/reposync/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reposync").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - REPOSYNC_GIT_PATH: Path to git executable
    /// - REPOSYNC_DEBUG: `1` or `true` enables debug mode
    /// - REPOSYNC_WORKSPACE: Directory holding working copies
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(git_path) = var("REPOSYNC_GIT_PATH") {
            self.git_path = git_path;
        }

        if let Some(debug) = var("REPOSYNC_DEBUG") {
            self.debug_mode = matches!(debug.trim().to_ascii_lowercase().as_str(), "1" | "true");
        }

        if let Some(root) = var("REPOSYNC_WORKSPACE") {
            self.workspace_root = Some(PathBuf::from(root));
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, git_path: Option<String>, debug_mode: bool) -> Self {
        if let Some(path) = git_path {
            self.git_path = path;
        }

        if debug_mode {
            self.debug_mode = true;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(git_path: Option<String>, debug_mode: bool) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(git_path, debug_mode))
    }

    /// Directory holding working copies
    ///
    /// Falls back to `~/.cache/reposync/repos`.
    pub fn workspace_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.workspace_root {
            return Ok(root.clone());
        }

        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| Error::Config("Could not determine cache directory".to_string()))?;

        Ok(cache_dir.join("reposync").join("repos"))
    }
}
