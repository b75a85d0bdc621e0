//! Applying suggested replacements to source text.

use boundary_lint_core::{Replacement, Violation};

/// Applies every replacement carried by `violations` to `source`.
///
/// Replacements are applied from the highest offset down so earlier
/// offsets stay valid. Overlapping or out-of-range replacements are
/// skipped. Returns the new text and the number applied.
#[must_use]
pub fn apply(source: &str, violations: &[Violation]) -> (String, usize) {
    let mut replacements: Vec<&Replacement> =
        violations.iter().filter_map(Violation::replacement).collect();
    replacements.sort_by(|a, b| b.location.offset.cmp(&a.location.offset));

    let mut text = source.to_owned();
    let mut applied = 0;
    let mut floor = usize::MAX;

    for r in replacements {
        let start = r.location.offset;
        let end = start + r.location.length;
        if end > floor
            || end > text.len()
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            tracing::debug!(start, end, "skipping overlapping or stale replacement");
            continue;
        }
        text.replace_range(start..end, &r.new_text);
        floor = start;
        applied += 1;
    }

    (text, applied)
}
