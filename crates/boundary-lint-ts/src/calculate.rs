//! Canonical relative specifiers for imports inside one boundary.

use std::path::Path;

use crate::paths::{segments_below, strip_candidate_extension};

/// Last path segment as it should be written in a specifier, or `None`
/// for a barrel file.
///
/// Only `extensions` are dropped; any other extension (`.css`, `.json`)
/// is part of the name.
fn specifier_segment(name: &str, index_basename: &str, extensions: &[String]) -> Option<String> {
    match strip_candidate_extension(name, extensions) {
        Some(stem) if stem == index_basename => None,
        Some(stem) => Some(stem.to_owned()),
        None => Some(name.to_owned()),
    }
}

/// `./<name>` for a sibling file, or `None` when the target is the barrel
/// of its own directory (ancestor-barrel case, reported separately).
#[must_use]
pub fn calculate_same_directory_path(
    target_abs: &Path,
    index_basename: &str,
    extensions: &[String],
) -> Option<String> {
    let name = target_abs.file_name()?.to_string_lossy();
    specifier_segment(&name, index_basename, extensions).map(|name| format!("./{name}"))
}

/// True iff the segment sequence is the boundary root itself.
#[must_use]
pub fn is_boundary_root(segments: &[String]) -> bool {
    segments.is_empty()
}

/// True iff `index` has reached the end of both sequences.
#[must_use]
pub fn are_both_paths_exhausted(index: usize, source: &[String], target: &[String]) -> bool {
    index >= source.len() && index >= target.len()
}

/// True iff the segment exists and is not blank.
#[must_use]
pub fn has_valid_first_differing_segment(segment: Option<&str>) -> bool {
    segment.is_some_and(|s| !s.is_empty())
}

/// Shortest relative specifier from `file_abs` to `target_abs`, both inside
/// the boundary rooted at `boundary_abs_dir`.
///
/// A candidate extension on the target is dropped and a trailing barrel
/// segment names its directory. Returns `None` when nothing distinguishes the target from
/// the file's own ancestors, i.e. the target is an ancestor barrel. Callers
/// must not pass a file importing itself.
#[must_use]
pub fn calculate_same_boundary_path(
    file_abs: &Path,
    target_abs: &Path,
    boundary_abs_dir: &Path,
    index_basename: &str,
    extensions: &[String],
) -> Option<String> {
    let source = segments_below(file_abs.parent()?, boundary_abs_dir)?;
    let mut target = segments_below(target_abs, boundary_abs_dir)?;
    if let Some(last) = target.pop() {
        target.extend(specifier_segment(&last, index_basename, extensions));
    }

    let mut i = 0;
    while !are_both_paths_exhausted(i, &source, &target) && source.get(i) == target.get(i) {
        i += 1;
    }

    if are_both_paths_exhausted(i, &source, &target)
        || !has_valid_first_differing_segment(target.get(i).map(String::as_str))
    {
        return None;
    }

    let rest = target[i..].join("/");
    if is_boundary_root(&source[i..]) {
        return Some(format!("./{rest}"));
    }
    Some(format!("{}{rest}", "../".repeat(source.len() - i)))
}
