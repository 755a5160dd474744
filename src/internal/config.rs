//! Shell configuration: loading and defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::internal::shell::{DEFAULT_LIBRARY, DEFAULT_PROMPT, ShellError, ShellResult};

/// Directory name used for project-local and user-global configuration.
pub const CONFIG_DIR_NAME: &str = ".cmdshell";
const USER_CONFIG_DIR_NAME: &str = "cmdshell";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt written before each input line.
    pub prompt: String,
    /// Library used for commands typed without a `Library.` prefix.
    pub default_library: String,
    /// Whether error lines are colored.
    pub color: bool,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            default_library: DEFAULT_LIBRARY.to_string(),
            color: true,
            log_level: "warn".to_string(),
        }
    }
}

impl ShellConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml(content: &str) -> ShellResult<Self> {
        toml::from_str(content).map_err(|e| ShellError::Config(e.to_string()))
    }

    /// Load an explicitly named config file.
    pub fn load_file(path: &Path) -> ShellResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .map_err(|e| ShellError::Config(format!("{e:#}")))?;
        Self::from_toml(&content)
    }

    /// Resolve configuration from the two-tier hierarchy.
    ///
    /// 1. `{working_dir}/.cmdshell/config.toml` (project-local)
    /// 2. `~/.config/cmdshell/config.toml` (user-global)
    ///
    /// The first file found wins. Unreadable or malformed files are logged
    /// and skipped, so the shell always starts.
    pub fn discover(working_dir: &Path) -> Self {
        candidate_paths(working_dir)
            .into_iter()
            .filter(|path| path.is_file())
            .find_map(|path| match Self::load_file(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!("Failed to load config {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default()
    }
}

fn candidate_paths(working_dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![working_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(USER_CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths
}
