//! Lexical path helpers shared by resolution and calculation.
//!
//! Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Normalizes a configured directory: no leading `./`, no trailing `/`.
/// `"."` becomes the empty string.
#[must_use]
pub fn trim_dir(dir: &str) -> &str {
    let mut s = dir.trim();
    while let Some(rest) = s.strip_prefix("./") {
        s = rest;
    }
    let s = s.trim_end_matches('/');
    if s == "." {
        ""
    } else {
        s
    }
}

/// Strips exactly one trailing `/`.
#[must_use]
pub fn strip_trailing_slash(spec: &str) -> &str {
    spec.strip_suffix('/').unwrap_or(spec)
}

/// Joins a root dir and a boundary dir the way absolute specifiers spell it.
#[must_use]
pub fn join_spec(root_dir: &str, dir: &str) -> String {
    if root_dir.is_empty() {
        dir.to_owned()
    } else {
        format!("{root_dir}/{dir}")
    }
}

/// Resolves `.` and `..` components lexically.
///
/// Returns `None` when `..` would climb above the filesystem root.
#[must_use]
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                _ => return None,
            },
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

/// Segments of `path` below `base`, or `None` if `path` is not inside `base`.
#[must_use]
pub fn segments_below(path: &Path, base: &Path) -> Option<Vec<String>> {
    let rest = path.strip_prefix(base).ok()?;
    Some(
        rest.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect(),
    )
}

/// `name` without the longest of `extensions` it ends in, or `None` when it
/// ends in none of them (`army.ts` → `army`, `button.css` → `None`).
#[must_use]
pub fn strip_candidate_extension<'a>(name: &'a str, extensions: &[String]) -> Option<&'a str> {
    extensions
        .iter()
        .filter(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
        .max_by_key(|ext| ext.len())
        .map(|ext| &name[..name.len() - ext.len()])
}

/// Whether `path` ends in one of `extensions` (each written with a dot).
#[must_use]
pub fn has_candidate_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    extensions
        .iter()
        .any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
}
