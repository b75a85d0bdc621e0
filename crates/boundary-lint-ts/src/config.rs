//! TOML configuration for import boundaries.
//!
//! Reads the `[analyzer]`, `[settings]` and `[[boundaries]]` sections of
//! `boundary-lint.toml`.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use boundary_lint_core::Severity;

use crate::paths::trim_dir;

/// How cross-boundary (and ancestor-barrel) specifiers are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossBoundaryStyle {
    /// `@queries`, `@queries/list`.
    #[default]
    Alias,
    /// `src/domain/queries`, relative to the project root.
    Absolute,
}

impl std::fmt::Display for CrossBoundaryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alias => write!(f, "alias"),
            Self::Absolute => write!(f, "absolute"),
        }
    }
}

/// Top-level boundary lint configuration.
#[derive(Debug, Clone)]
pub struct BoundaryConfig {
    /// Project root directory.
    pub root: PathBuf,

    /// Glob patterns to exclude.
    pub exclude: Vec<String>,

    /// Resolution and reporting settings.
    pub settings: Settings,

    /// Boundary declarations, in declaration order.
    pub boundaries: Vec<BoundaryDef>,
}

/// The `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory (relative to the project root) that boundary dirs live in.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,

    /// Style used for cross-boundary specifiers.
    #[serde(default)]
    pub cross_boundary_style: CrossBoundaryStyle,

    /// Basename of barrel files.
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Candidate extensions, in priority order.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Severity of every reported violation.
    #[serde(default)]
    pub severity: Severity,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            cross_boundary_style: CrossBoundaryStyle::default(),
            index_file: default_index_file(),
            extensions: default_extensions(),
            severity: Severity::default(),
        }
    }
}

/// One `[[boundaries]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundaryDef {
    /// Directory relative to `settings.root_dir` (e.g. `"domain/queries"`).
    pub dir: String,
    /// Import alias (e.g. `"@queries"`).
    pub alias: String,
    /// Aliases this boundary may import from.
    #[serde(default)]
    pub allow_imports_from: Vec<String>,
    /// Aliases this boundary may import types from.
    #[serde(default)]
    pub allow_type_imports_from: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_root_dir() -> String {
    "src".to_owned()
}

fn default_index_file() -> String {
    "index".to_owned()
}

fn default_extensions() -> Vec<String> {
    [".ts", ".tsx", ".js", ".jsx"]
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },
    /// Config is structurally invalid.
    #[error("config validation: {0}")]
    Validation(String),
}

impl BoundaryConfig {
    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct RawConfig {
            #[serde(default)]
            analyzer: AnalyzerSection,
            #[serde(default)]
            settings: Settings,
            #[serde(default)]
            boundaries: Vec<BoundaryDef>,
        }

        #[derive(Deserialize)]
        struct AnalyzerSection {
            #[serde(default = "default_root")]
            root: PathBuf,
            #[serde(default)]
            exclude: Vec<String>,
        }

        impl Default for AnalyzerSection {
            fn default() -> Self {
                Self {
                    root: default_root(),
                    exclude: Vec::new(),
                }
            }
        }

        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let mut settings = raw.settings;
        settings.root_dir = trim_dir(&settings.root_dir).to_owned();

        let boundaries = raw
            .boundaries
            .into_iter()
            .map(|mut b| {
                b.dir = trim_dir(&b.dir).to_owned();
                b
            })
            .collect();

        Ok(Self {
            root: raw.analyzer.root,
            exclude: raw.analyzer.exclude,
            settings,
            boundaries,
        })
    }

    /// Validate config consistency.
    ///
    /// Allow-list entries must name declared aliases; at lookup time an
    /// unmatched alias is simply "no boundary".
    ///
    /// # Errors
    ///
    /// Returns error describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.settings;
        if s.index_file.is_empty() {
            return Err(ConfigError::Validation(
                "settings.index_file: must not be empty".into(),
            ));
        }
        if s.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "settings.extensions: at least one extension required".into(),
            ));
        }
        if let Some(ext) = s.extensions.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
            return Err(ConfigError::Validation(format!(
                "settings.extensions: '{ext}' must start with '.'"
            )));
        }

        let mut aliases: HashSet<&str> = HashSet::new();
        let mut dirs: HashSet<&str> = HashSet::new();
        for (i, b) in self.boundaries.iter().enumerate() {
            if b.alias.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "boundaries[{i}]: empty alias"
                )));
            }
            if b.dir.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "boundaries[{i}] ({}): empty dir",
                    b.alias
                )));
            }
            if !aliases.insert(b.alias.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "boundaries[{i}]: duplicate alias '{}'",
                    b.alias
                )));
            }
            if !dirs.insert(b.dir.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "boundaries[{i}] ({}): duplicate dir '{}'",
                    b.alias, b.dir
                )));
            }
        }

        for b in &self.boundaries {
            for (key, list) in [
                ("allow_imports_from", &b.allow_imports_from),
                ("allow_type_imports_from", &b.allow_type_imports_from),
            ] {
                for dep in list {
                    if !aliases.contains(dep.as_str()) {
                        return Err(ConfigError::Validation(format!(
                            "{}.{key}: unknown alias '{dep}'",
                            b.alias
                        )));
                    }
                    if dep == &b.alias {
                        return Err(ConfigError::Validation(format!(
                            "{}.{key}: self-reference",
                            b.alias
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[analyzer]
root = "./app"
exclude = ["**/node_modules/**"]

[settings]
root_dir = "./src/"
cross_boundary_style = "absolute"
index_file = "index"
extensions = [".ts"]
severity = "warn"

[[boundaries]]
dir = "domain/entities/"
alias = "@entities"

[[boundaries]]
dir = "domain/queries"
alias = "@queries"
allow_imports_from = ["@entities"]
allow_type_imports_from = ["@events"]

[[boundaries]]
dir = "domain/events"
alias = "@events"
allow_imports_from = ["@entities"]
"#;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[[boundaries]]
dir = "domain"
alias = "@domain"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.settings.root_dir, "src");
        assert_eq!(config.settings.cross_boundary_style, CrossBoundaryStyle::Alias);
        assert_eq!(config.settings.index_file, "index");
        assert_eq!(config.settings.severity, Severity::Error);
        assert_eq!(config.boundaries.len(), 1);
        assert!(config.boundaries[0].allow_imports_from.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let config = BoundaryConfig::parse(FULL).expect("parse failed");
        assert_eq!(config.root, PathBuf::from("./app"));
        assert_eq!(config.exclude, vec!["**/node_modules/**".to_string()]);
        assert_eq!(config.settings.root_dir, "src");
        assert_eq!(config.settings.cross_boundary_style, CrossBoundaryStyle::Absolute);
        assert_eq!(config.settings.extensions, vec![".ts".to_string()]);
        assert_eq!(config.settings.severity, Severity::Warning);
        assert_eq!(config.boundaries[0].dir, "domain/entities");
        assert_eq!(
            config.boundaries[1].allow_type_imports_from,
            vec!["@events".to_string()]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_style() {
        let toml = r#"
[settings]
cross_boundary_style = "relative"
"#;
        assert!(matches!(
            BoundaryConfig::parse(toml),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn validate_catches_unknown_alias() {
        let toml = r#"
[[boundaries]]
dir = "domain/queries"
alias = "@queries"
allow_imports_from = ["@nonexistent"]
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("@nonexistent"));
    }

    #[test]
    fn validate_catches_unknown_type_alias() {
        let toml = r#"
[[boundaries]]
dir = "domain/queries"
alias = "@queries"
allow_type_imports_from = ["@ghost"]
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("allow_type_imports_from"));
    }

    #[test]
    fn validate_catches_duplicate_alias() {
        let toml = r#"
[[boundaries]]
dir = "a"
alias = "@x"

[[boundaries]]
dir = "b"
alias = "@x"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().unwrap_err().to_string().contains("duplicate alias"));
    }

    #[test]
    fn validate_catches_duplicate_dir_after_trimming() {
        let toml = r#"
[[boundaries]]
dir = "a/"
alias = "@x"

[[boundaries]]
dir = "a"
alias = "@y"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().unwrap_err().to_string().contains("duplicate dir"));
    }

    #[test]
    fn validate_catches_self_reference() {
        let toml = r#"
[[boundaries]]
dir = "domain"
alias = "@domain"
allow_imports_from = ["@domain"]
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_catches_bad_extension() {
        let toml = r#"
[settings]
extensions = ["ts"]
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().unwrap_err().to_string().contains("'ts'"));
    }
}
