//! Configuration file resolution with global fallback.
//!
//! The first match wins:
//!
//! 1. `--config` flag or `$LAYOUT_LINT_CONFIG`
//! 2. `layout-lint.toml` or `.layout-lint.toml` in the project directory
//! 3. `config.toml` in the global directory (`$LAYOUT_LINT_CONFIG_DIR`, else `~/.layout-lint/`)
//! 4. Built-in defaults

use anyhow::{Context, Result};
use layout_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line or through the environment.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found; built-in defaults apply.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the resolved file, or returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["layout-lint.toml", ".layout-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Directory searched for a project config when checking `path`.
///
/// A file argument is looked up next to the file.
#[must_use]
pub fn project_dir(path: &Path) -> &Path {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    } else {
        path
    }
}

/// Resolves the configuration file for a project directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(project_dir, explicit, global_config_dir().as_deref())
}

/// Resolution with the global directory passed in, so tests need no env vars.
fn resolve_in(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.exists())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    let global = global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.exists());
    match global {
        Some(found) => {
            tracing::debug!("Found global config: {}", found.display());
            ConfigSource::Global(found)
        }
        None => ConfigSource::Default,
    }
}

/// Global config directory: `$LAYOUT_LINT_CONFIG_DIR`, else `~/.layout-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("LAYOUT_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".layout-lint"))
}
