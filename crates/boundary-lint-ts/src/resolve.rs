//! Import specifier resolution.
//!
//! Turns a raw specifier plus the importing file's absolute path into the
//! absolute target file and its directory. Three specifier styles are
//! understood (relative, alias, root-relative absolute) and two subjects
//! (a file, or a directory standing for its barrel file).

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::boundary::BoundaryRegistry;
use crate::config::{CrossBoundaryStyle, Settings};
use crate::paths::{has_candidate_extension, normalize, strip_trailing_slash};

/// How a specifier is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `./x`, `../x`, `.`, `..`
    Relative,
    /// `@alias` or `@alias/rest`
    Alias,
    /// `src/...`, joined onto the project root
    Absolute,
}

/// What the specifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSubject {
    /// A file, named with or without its extension.
    File,
    /// A directory, resolved to its index file.
    Directory,
}

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Absolute path of the target file.
    pub target_abs: PathBuf,
    /// Absolute directory containing `target_abs`.
    pub target_dir: PathBuf,
    /// File or directory import.
    pub subject: ImportSubject,
    /// How the specifier was written.
    pub kind: SpecifierKind,
}

/// Settings that drive resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Cross-boundary specifier style.
    pub style: CrossBoundaryStyle,
    /// Barrel basename (e.g. `index`).
    pub index_basename: String,
    /// Candidate extensions in priority order.
    pub extensions: Vec<String>,
}

impl ResolveOptions {
    /// Options taken from the `[settings]` section.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            style: settings.cross_boundary_style,
            index_basename: settings.index_file.clone(),
            extensions: settings.extensions.clone(),
        }
    }
}

/// Existence check used to tell files from directories.
pub trait FileProbe {
    /// Whether a regular file exists at `path`.
    fn is_file(&self, path: &Path) -> bool;
}

/// Probes the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

impl FileProbe for HashSet<PathBuf> {
    fn is_file(&self, path: &Path) -> bool {
        self.contains(path)
    }
}

/// Why a specifier could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Empty specifier.
    #[error("empty import specifier")]
    Empty,
    /// Non-relative specifier naming no boundary alias.
    #[error("'{0}' does not name a boundary alias")]
    UnknownAlias(String),
    /// Non-relative specifier not under the root dir.
    #[error("'{0}' is not under the root directory")]
    OutsideRoot(String),
    /// Relative specifier climbing out of the project root.
    #[error("'{0}' escapes the project root")]
    EscapesRoot(String),
}

impl ResolutionError {
    /// Whether the specifier most likely names a package external.
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::UnknownAlias(_) | Self::OutsideRoot(_))
    }
}

/// Classifies a specifier under the given style.
///
/// Returns `None` for specifiers that are neither relative nor written in
/// the configured cross-boundary style (package imports).
#[must_use]
pub fn classify_specifier(
    specifier: &str,
    registry: &BoundaryRegistry,
    style: CrossBoundaryStyle,
) -> Option<SpecifierKind> {
    if is_relative(specifier) {
        return Some(SpecifierKind::Relative);
    }
    match style {
        CrossBoundaryStyle::Alias => registry
            .alias_for_specifier(specifier)
            .map(|_| SpecifierKind::Alias),
        CrossBoundaryStyle::Absolute => {
            let spec = strip_trailing_slash(specifier);
            let under = |prefix: &str| {
                spec == prefix
                    || spec
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            };
            let root_dir = registry.root_dir();
            let matched = if root_dir.is_empty() {
                registry.boundaries().iter().any(|b| under(&b.dir))
            } else {
                under(root_dir)
            };
            matched.then_some(SpecifierKind::Absolute)
        }
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Resolves `specifier`, written in `importing_file`, to its target.
///
/// # Errors
///
/// Returns [`ResolutionError`] when the specifier is empty, is not written
/// in a style this project resolves, or climbs out of the project root.
pub fn resolve_import(
    specifier: &str,
    importing_file: &Path,
    registry: &BoundaryRegistry,
    options: &ResolveOptions,
    probe: &dyn FileProbe,
) -> Result<ResolvedImport, ResolutionError> {
    if specifier.trim().is_empty() {
        return Err(ResolutionError::Empty);
    }

    let Some(kind) = classify_specifier(specifier, registry, options.style) else {
        return Err(match options.style {
            CrossBoundaryStyle::Alias => ResolutionError::UnknownAlias(specifier.to_owned()),
            CrossBoundaryStyle::Absolute => ResolutionError::OutsideRoot(specifier.to_owned()),
        });
    };

    let escapes = || ResolutionError::EscapesRoot(specifier.to_owned());
    let trimmed = strip_trailing_slash(specifier);

    let joined = match kind {
        SpecifierKind::Relative => importing_file.parent().ok_or_else(escapes)?.join(trimmed),
        SpecifierKind::Alias => {
            let boundary = registry
                .alias_for_specifier(specifier)
                .ok_or_else(|| ResolutionError::UnknownAlias(specifier.to_owned()))?;
            let rest = trimmed[boundary.alias.len().min(trimmed.len())..].trim_start_matches('/');
            if rest.is_empty() {
                boundary.abs_dir.clone()
            } else {
                boundary.abs_dir.join(rest)
            }
        }
        SpecifierKind::Absolute => registry.project_root().join(trimmed),
    };

    let path = normalize(&joined).ok_or_else(escapes)?;
    if kind == SpecifierKind::Relative && !path.starts_with(registry.project_root()) {
        return Err(escapes());
    }

    Ok(classify_subject(path, kind, options, probe))
}

fn classify_subject(
    path: PathBuf,
    kind: SpecifierKind,
    options: &ResolveOptions,
    probe: &dyn FileProbe,
) -> ResolvedImport {
    let file = |target_abs: PathBuf| {
        let target_dir = target_abs.parent().map(Path::to_path_buf).unwrap_or_default();
        ResolvedImport {
            target_abs,
            target_dir,
            subject: ImportSubject::File,
            kind,
        }
    };

    if has_candidate_extension(&path, &options.extensions) || probe.is_file(&path) {
        return file(path);
    }

    // Extensionless file import: `./army` -> `army.ts`.
    if let Some(found) = options
        .extensions
        .iter()
        .map(|ext| with_suffix(&path, ext))
        .find(|candidate| probe.is_file(candidate))
    {
        return file(found);
    }

    let index_for = |ext: &str| path.join(format!("{}{ext}", options.index_basename));
    let target_abs = options
        .extensions
        .iter()
        .map(|ext| index_for(ext))
        .find(|candidate| probe.is_file(candidate))
        .unwrap_or_else(|| index_for(options.extensions.first().map_or("", String::as_str)));

    ResolvedImport {
        target_abs,
        target_dir: path,
        subject: ImportSubject::Directory,
        kind,
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}
