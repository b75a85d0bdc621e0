//! Locating and loading `boundary-lint.toml`.
//!
//! Lookup order:
//!
//! 1. `--config` flag (explicit path, trusted as-is)
//! 2. `{project}/boundary-lint.toml` or `{project}/.boundary-lint.toml`
//! 3. `$BOUNDARY_LINT_CONFIG_DIR/config.toml` or `~/.boundary-lint/config.toml`
//!
//! Unlike most linters there is no useful default: without boundaries there
//! is nothing to check, so a missing config is an error.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use boundary_lint_ts::BoundaryConfig;

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the user-wide config directory.
    Global(PathBuf),
    /// Nothing found.
    Missing,
}

impl ConfigSource {
    /// The resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Missing => None,
        }
    }

    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Fails when no file was found, it cannot be read or parsed, or it
    /// declares inconsistent boundaries.
    pub fn load(&self) -> Result<BoundaryConfig> {
        let Some(path) = self.path() else {
            bail!("No boundary-lint.toml found. Run `boundary-lint init` to create one.");
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        let config = BoundaryConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["boundary-lint.toml", ".boundary-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(project_dir, explicit, global_config_dir().as_deref())
}

fn resolve_in(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Missing,
    }
}

/// `$BOUNDARY_LINT_CONFIG_DIR`, else `~/.boundary-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("BOUNDARY_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".boundary-lint"))
}
