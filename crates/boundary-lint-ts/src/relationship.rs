//! Structural relationship between an importing file and its target.

use std::path::Path;

use crate::boundary::Boundary;
use crate::config::CrossBoundaryStyle;
use crate::paths::{join_spec, strip_trailing_slash};
use crate::resolve::ResolvedImport;

/// How an import's target sits relative to the importing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Same boundary, same directory.
    SameDirectory,
    /// Same boundary, different directory.
    SameBoundary,
    /// The specifier names the importing file's own boundary root.
    AncestorBarrel,
    /// Different boundaries, or at least one side outside every boundary.
    CrossBoundary,
}

/// True unless both sides are the same boundary.
///
/// Two unboundaried sides count as cross-boundary; validation lets them
/// through because the importing side has no rules.
#[must_use]
pub fn is_cross_boundary_import(file: Option<&Boundary>, target: Option<&Boundary>) -> bool {
    match (file, target) {
        (Some(a), Some(b)) => a.alias != b.alias,
        _ => true,
    }
}

/// True when `specifier` names `boundary`'s own root in the given style.
#[must_use]
pub fn is_ancestor_barrel_import(
    specifier: &str,
    boundary: Option<&Boundary>,
    root_dir: &str,
    style: CrossBoundaryStyle,
) -> bool {
    let Some(boundary) = boundary else {
        return false;
    };
    match style {
        CrossBoundaryStyle::Alias => specifier == boundary.alias,
        CrossBoundaryStyle::Absolute => {
            strip_trailing_slash(specifier) == join_spec(root_dir, &boundary.dir)
        }
    }
}

/// Classifies one resolved import.
///
/// The ancestor-barrel form wins over the same-boundary forms so that the
/// fix points at the module rather than the barrel.
#[must_use]
pub fn detect_relationship(
    file_boundary: Option<&Boundary>,
    target_boundary: Option<&Boundary>,
    file_abs: &Path,
    resolved: &ResolvedImport,
    specifier: &str,
    root_dir: &str,
    style: CrossBoundaryStyle,
) -> Relationship {
    if is_ancestor_barrel_import(specifier, file_boundary, root_dir, style) {
        return Relationship::AncestorBarrel;
    }
    if is_cross_boundary_import(file_boundary, target_boundary) {
        return Relationship::CrossBoundary;
    }
    if file_abs.parent() == Some(resolved.target_dir.as_path()) {
        Relationship::SameDirectory
    } else {
        Relationship::SameBoundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryDef;
    use crate::resolve::{ImportSubject, SpecifierKind};
    use std::path::PathBuf;

    fn boundary(dir: &str, alias: &str) -> Boundary {
        Boundary::new(
            &BoundaryDef {
                dir: dir.into(),
                alias: alias.into(),
                allow_imports_from: vec![],
                allow_type_imports_from: vec![],
            },
            Path::new("/p/src"),
        )
    }

    fn resolved(target: &str) -> ResolvedImport {
        let target_abs = PathBuf::from(target);
        ResolvedImport {
            target_dir: target_abs.parent().map(Path::to_path_buf).unwrap_or_default(),
            target_abs,
            subject: ImportSubject::File,
            kind: SpecifierKind::Relative,
        }
    }

    #[test]
    fn ancestor_barrel_alias_style() {
        let q = boundary("domain/queries", "@queries");
        assert!(is_ancestor_barrel_import("@queries", Some(&q), "src", CrossBoundaryStyle::Alias));
        assert!(!is_ancestor_barrel_import("@events", Some(&q), "src", CrossBoundaryStyle::Alias));
        assert!(!is_ancestor_barrel_import(
            "@queries/list",
            Some(&q),
            "src",
            CrossBoundaryStyle::Alias
        ));
        assert!(!is_ancestor_barrel_import("@queries", None, "src", CrossBoundaryStyle::Alias));
    }

    #[test]
    fn ancestor_barrel_absolute_style() {
        let q = boundary("domain/queries", "@queries");
        let abs = CrossBoundaryStyle::Absolute;
        assert!(is_ancestor_barrel_import("src/domain/queries", Some(&q), "src", abs));
        assert!(is_ancestor_barrel_import("src/domain/queries/", Some(&q), "src", abs));
        assert!(!is_ancestor_barrel_import("src/domain/queries//", Some(&q), "src", abs));
        assert!(!is_ancestor_barrel_import("src/domain/events", Some(&q), "src", abs));
    }

    #[test]
    fn cross_boundary_truth_table() {
        let q = boundary("domain/queries", "@queries");
        let e = boundary("domain/events", "@events");
        assert!(is_cross_boundary_import(None, Some(&q)));
        assert!(is_cross_boundary_import(Some(&q), None));
        assert!(is_cross_boundary_import(None, None));
        assert!(!is_cross_boundary_import(Some(&q), Some(&q)));
        assert!(is_cross_boundary_import(Some(&q), Some(&e)));
    }

    #[test]
    fn detects_same_directory() {
        let q = boundary("domain/queries", "@queries");
        let file = Path::new("/p/src/domain/queries/a.ts");
        let r = resolved("/p/src/domain/queries/b.ts");
        let rel = detect_relationship(Some(&q), Some(&q), file, &r, "./b", "src", CrossBoundaryStyle::Alias);
        assert_eq!(rel, Relationship::SameDirectory);
    }

    #[test]
    fn detects_same_boundary() {
        let q = boundary("domain/queries", "@queries");
        let file = Path::new("/p/src/domain/queries/a.ts");
        let r = resolved("/p/src/domain/queries/list/b.ts");
        let rel = detect_relationship(
            Some(&q),
            Some(&q),
            file,
            &r,
            "@queries/list/b",
            "src",
            CrossBoundaryStyle::Alias,
        );
        assert_eq!(rel, Relationship::SameBoundary);
    }

    #[test]
    fn ancestor_barrel_takes_precedence() {
        let q = boundary("domain/queries", "@queries");
        let file = Path::new("/p/src/domain/queries/list/a.ts");
        let r = resolved("/p/src/domain/queries/index.ts");
        let rel = detect_relationship(Some(&q), Some(&q), file, &r, "@queries", "src", CrossBoundaryStyle::Alias);
        assert_eq!(rel, Relationship::AncestorBarrel);
    }

    #[test]
    fn detects_cross_boundary() {
        let q = boundary("domain/queries", "@queries");
        let e = boundary("domain/events", "@events");
        let file = Path::new("/p/src/domain/queries/a.ts");
        let r = resolved("/p/src/domain/events/index.ts");
        let rel = detect_relationship(Some(&q), Some(&e), file, &r, "@events", "src", CrossBoundaryStyle::Alias);
        assert_eq!(rel, Relationship::CrossBoundary);
        let rel = detect_relationship(None, None, file, &r, "../x", "src", CrossBoundaryStyle::Alias);
        assert_eq!(rel, Relationship::CrossBoundary);
    }
}
