//! Boundary rule engine.
//!
//! Runs every import of a [`FileAnalysis`] through resolution, membership,
//! relationship detection and policy, handing each violation to a
//! [`Reporter`].

use std::path::Path;

use boundary_lint_core::{
    Fix, MessageId, NodeSpan, Reporter, ResultReporter, Severity, Violation, ViolationData,
    ViolationRecord,
};
use tracing::{debug, warn};

use crate::boundary::{Boundary, BoundaryRegistry};
use crate::calculate::{calculate_same_boundary_path, calculate_same_directory_path};
use crate::config::{BoundaryConfig, CrossBoundaryStyle};
use crate::extractor::{FileAnalysis, ImportInfo};
use crate::paths::has_candidate_extension;
use crate::relationship::{detect_relationship, Relationship};
use crate::resolve::{resolve_import, FileProbe, FsProbe, ResolveOptions};
use crate::validate::{validate_boundary_rules, BoundaryCheck};

/// Evaluates boundary rules against extracted file analysis.
pub struct BoundaryRuleEngine {
    registry: BoundaryRegistry,
    options: ResolveOptions,
    severity: Severity,
    probe: Box<dyn FileProbe + Send + Sync>,
}

impl BoundaryRuleEngine {
    /// Create an engine that probes the real filesystem.
    #[must_use]
    pub fn new(config: &BoundaryConfig, project_root: &Path) -> Self {
        Self::with_probe(config, project_root, FsProbe)
    }

    /// Create an engine with a custom existence probe.
    #[must_use]
    pub fn with_probe(
        config: &BoundaryConfig,
        project_root: &Path,
        probe: impl FileProbe + Send + Sync + 'static,
    ) -> Self {
        Self {
            registry: BoundaryRegistry::new(config, project_root),
            options: ResolveOptions::from_settings(&config.settings),
            severity: config.settings.severity,
            probe: Box::new(probe),
        }
    }

    /// The boundaries this engine checks against.
    #[must_use]
    pub fn registry(&self) -> &BoundaryRegistry {
        &self.registry
    }

    /// Check one file, collecting violations located relative to the
    /// project root.
    #[must_use]
    pub fn check_file(&self, analysis: &FileAnalysis) -> Vec<Violation> {
        let display = analysis
            .file_path
            .strip_prefix(self.registry.project_root())
            .unwrap_or(&analysis.file_path);
        let mut reporter = ResultReporter::new(display, self.severity);
        self.check(analysis, &mut reporter);
        reporter.into_violations()
    }

    /// Check one file, reporting each violation once.
    pub fn check(&self, analysis: &FileAnalysis, reporter: &mut dyn Reporter) {
        let file_abs = analysis.file_path.as_path();
        let file_boundary = self.registry.find_boundary_for(file_abs);
        debug!(
            file = %file_abs.display(),
            boundary = file_boundary.map_or("-", |b| b.alias.as_str()),
            imports = analysis.imports.len(),
            "checking file"
        );

        for imp in &analysis.imports {
            self.check_import(file_abs, file_boundary, imp, reporter);
        }
    }

    fn check_import(
        &self,
        file_abs: &Path,
        file_boundary: Option<&Boundary>,
        imp: &ImportInfo,
        reporter: &mut dyn Reporter,
    ) {
        let resolved = match resolve_import(
            &imp.specifier,
            file_abs,
            &self.registry,
            &self.options,
            self.probe.as_ref(),
        ) {
            Ok(r) => r,
            Err(e) if e.is_external() => {
                debug!(specifier = %imp.specifier, "skipping external import");
                return;
            }
            Err(e) => {
                warn!(
                    file = %file_abs.display(),
                    line = imp.line,
                    error = %e,
                    "skipping unresolvable import"
                );
                return;
            }
        };

        if resolved.target_abs == file_abs {
            debug!(specifier = %imp.specifier, "skipping self import");
            return;
        }

        let target_boundary = self.registry.find_boundary_for(&resolved.target_abs);
        let relationship = detect_relationship(
            file_boundary,
            target_boundary,
            file_abs,
            &resolved,
            &imp.specifier,
            self.registry.root_dir(),
            self.options.style,
        );
        debug!(specifier = %imp.specifier, ?relationship, "classified import");

        let span = NodeSpan {
            line: imp.line,
            column: imp.column + 1,
            offset: imp.span.0,
            length: imp.span.1.saturating_sub(imp.span.0),
        };
        let index = self.options.index_basename.as_str();
        let extensions = self.options.extensions.as_slice();

        match relationship {
            Relationship::AncestorBarrel => {
                self.report_ancestor_barrel(imp, file_boundary, span, reporter);
            }
            Relationship::SameDirectory => {
                match calculate_same_directory_path(&resolved.target_abs, index, extensions) {
                    Some(expected) => self.expect_specifier(imp, &expected, span, reporter),
                    None => self.report_ancestor_barrel(imp, None, span, reporter),
                }
            }
            Relationship::SameBoundary => {
                let expected = file_boundary.and_then(|b| {
                    calculate_same_boundary_path(
                        file_abs,
                        &resolved.target_abs,
                        &b.abs_dir,
                        index,
                        extensions,
                    )
                });
                match expected {
                    Some(expected) => self.expect_specifier(imp, &expected, span, reporter),
                    None => self.report_ancestor_barrel(imp, None, span, reporter),
                }
            }
            Relationship::CrossBoundary => {
                let check = BoundaryCheck {
                    file_boundary,
                    target_boundary,
                    is_type_only: imp.type_only,
                    span,
                    severity: Some(self.severity),
                };
                if validate_boundary_rules(&check, reporter) {
                    return;
                }
                // Assets have no barrel to go through.
                if !has_candidate_extension(&resolved.target_abs, extensions) {
                    return;
                }
                if let Some(target) = target_boundary {
                    let expected = self.canonical_specifier(target);
                    self.expect_specifier(imp, &expected, span, reporter);
                }
            }
        }
    }

    /// How other boundaries must spell `boundary`.
    fn canonical_specifier(&self, boundary: &Boundary) -> String {
        match self.options.style {
            CrossBoundaryStyle::Alias => boundary.alias.clone(),
            CrossBoundaryStyle::Absolute => self.registry.absolute_spec(boundary),
        }
    }

    fn expect_specifier(
        &self,
        imp: &ImportInfo,
        expected: &str,
        span: NodeSpan,
        reporter: &mut dyn Reporter,
    ) {
        if imp.specifier == expected {
            return;
        }
        let data = ViolationData {
            expected_path: Some(expected.to_owned()),
            actual_path: Some(imp.specifier.clone()),
            ..ViolationData::default()
        };
        reporter.report(
            ViolationRecord::new(MessageId::IncorrectImportPath, span, data)
                .with_severity(self.severity)
                .with_fix(Fix::new(imp.span, imp.quoted(expected))),
        );
    }

    /// `boundary` is set when the specifier named a boundary root; otherwise
    /// the written specifier is reported as the path.
    fn report_ancestor_barrel(
        &self,
        imp: &ImportInfo,
        boundary: Option<&Boundary>,
        span: NodeSpan,
        reporter: &mut dyn Reporter,
    ) {
        let data = match (boundary, self.options.style) {
            (Some(b), CrossBoundaryStyle::Alias) => ViolationData {
                alias: Some(b.alias.clone()),
                ..ViolationData::default()
            },
            (Some(b), CrossBoundaryStyle::Absolute) => ViolationData {
                alias: Some(b.alias.clone()),
                path: Some(self.registry.absolute_spec(b)),
                ..ViolationData::default()
            },
            (None, _) => ViolationData {
                path: Some(imp.specifier.clone()),
                ..ViolationData::default()
            },
        };
        reporter.report(
            ViolationRecord::new(MessageId::AncestorBarrelImport, span, data)
                .with_severity(self.severity),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryDef, Settings};
    use std::collections::HashSet;
    use std::path::PathBuf;

    const ROOT: &str = "/project";

    fn def(dir: &str, alias: &str, allow: &[&str], allow_types: &[&str]) -> BoundaryDef {
        BoundaryDef {
            dir: dir.into(),
            alias: alias.into(),
            allow_imports_from: allow.iter().map(|s| (*s).into()).collect(),
            allow_type_imports_from: allow_types.iter().map(|s| (*s).into()).collect(),
        }
    }

    fn test_config(style: CrossBoundaryStyle) -> BoundaryConfig {
        BoundaryConfig {
            root: ".".into(),
            exclude: vec![],
            settings: Settings {
                cross_boundary_style: style,
                extensions: vec![".ts".into()],
                ..Settings::default()
            },
            boundaries: vec![
                def("domain/entities", "@entities", &[], &[]),
                def("domain/queries", "@queries", &["@entities"], &["@events"]),
                def("domain/events", "@events", &["@entities"], &[]),
            ],
        }
    }

    fn files() -> HashSet<PathBuf> {
        [
            "src/domain/entities/index.ts",
            "src/domain/entities/army.ts",
            "src/domain/entities/theme.css",
            "src/domain/queries/index.ts",
            "src/domain/queries/get.ts",
            "src/domain/queries/file.ts",
            "src/domain/queries/list/index.ts",
            "src/domain/queries/list/all.ts",
            "src/domain/events/index.ts",
            "src/domain/queries/view.css",
            "src/domain/queries/data.json",
            "src/domain/queries/assets/logo.svg",
            "src/main.ts",
        ]
        .iter()
        .map(|p| Path::new(ROOT).join(p))
        .collect()
    }

    fn engine(style: CrossBoundaryStyle) -> BoundaryRuleEngine {
        BoundaryRuleEngine::with_probe(&test_config(style), Path::new(ROOT), files())
    }

    fn analysis(file: &str, imports: &[(&str, bool)]) -> FileAnalysis {
        FileAnalysis {
            file_path: Path::new(ROOT).join(file),
            imports: imports
                .iter()
                .enumerate()
                .map(|(i, (spec, type_only))| ImportInfo {
                    line: i + 1,
                    column: 20,
                    specifier: (*spec).into(),
                    type_only: *type_only,
                    span: (i * 100 + 20, i * 100 + 22 + spec.len()),
                    quote: '\'',
                })
                .collect(),
        }
    }

    fn records(engine: &BoundaryRuleEngine, a: &FileAnalysis) -> Vec<ViolationRecord> {
        let mut sink = Vec::new();
        engine.check(a, &mut sink);
        sink
    }

    #[test]
    fn allowed_cross_boundary_import_is_clean() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/get.ts", &[("@entities", false)]);
        assert!(records(&e, &a).is_empty());
    }

    #[test]
    fn forbidden_cross_boundary_import() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/events/index.ts", &[("@queries", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].message_id, MessageId::BoundaryViolation);
        assert_eq!(r[0].data.from.as_deref(), Some("@events"));
        assert_eq!(r[0].data.to.as_deref(), Some("@queries"));
        assert!(r[0].fix.is_none());
    }

    #[test]
    fn type_only_allowance_depends_on_import_kind() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis(
            "src/domain/queries/get.ts",
            &[("@events", true), ("@events", false)],
        );
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].span.line, 2);
        assert_eq!(r[0].message_id, MessageId::BoundaryViolation);
    }

    #[test]
    fn deep_cross_boundary_import_is_rewritten_to_alias() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/get.ts", &[("@entities/army", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].message_id, MessageId::IncorrectImportPath);
        assert_eq!(r[0].data.expected_path.as_deref(), Some("@entities"));
        assert_eq!(r[0].fix.as_ref().map(|f| f.text.as_str()), Some("'@entities'"));
    }

    #[test]
    fn relative_cross_boundary_import_is_rewritten() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/get.ts", &[("../entities", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].data.expected_path.as_deref(), Some("@entities"));
        assert_eq!(r[0].data.actual_path.as_deref(), Some("../entities"));
    }

    #[test]
    fn own_alias_is_ancestor_barrel() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/list/all.ts", &[("@queries", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].message_id, MessageId::AncestorBarrelImport);
        assert_eq!(r[0].data.alias.as_deref(), Some("@queries"));
        assert!(r[0].fix.is_none());
    }

    #[test]
    fn own_path_is_ancestor_barrel_in_absolute_style() {
        let e = engine(CrossBoundaryStyle::Absolute);
        let a = analysis("src/domain/queries/get.ts", &[("src/domain/queries/", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].message_id, MessageId::AncestorBarrelImport);
        assert_eq!(r[0].data.path.as_deref(), Some("src/domain/queries"));
    }

    #[test]
    fn same_directory_import_through_alias_is_rewritten() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/get.ts", &[("@queries/file", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].message_id, MessageId::IncorrectImportPath);
        assert_eq!(r[0].data.expected_path.as_deref(), Some("./file"));
    }

    #[test]
    fn same_directory_canonical_import_is_clean() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/get.ts", &[("./file", false)]);
        assert!(records(&e, &a).is_empty());
    }

    #[test]
    fn same_directory_with_extension_is_rewritten() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/get.ts", &[("./file.ts", false)]);
        let r = records(&e, &a);
        assert_eq!(r[0].data.expected_path.as_deref(), Some("./file"));
    }

    #[test]
    fn own_directory_barrel_is_ancestor_barrel() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/list/all.ts", &[(".", false), ("./index", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 2);
        assert!(r
            .iter()
            .all(|rec| rec.message_id == MessageId::AncestorBarrelImport));
        assert_eq!(r[0].data.path.as_deref(), Some("."));
    }

    #[test]
    fn same_boundary_import_uses_shortest_relative_path() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/list/all.ts", &[("../../queries/file", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].data.expected_path.as_deref(), Some("../file"));
    }

    #[test]
    fn same_boundary_child_directory() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/get.ts", &[("./list", false)]);
        assert!(records(&e, &a).is_empty());
    }

    #[test]
    fn parent_barrel_within_boundary_is_ancestor_barrel() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/list/all.ts", &[("..", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].message_id, MessageId::AncestorBarrelImport);
    }

    #[test]
    fn external_and_self_imports_are_skipped() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis(
            "src/domain/queries/get.ts",
            &[("react", false), ("@types/node", false), ("./get", false)],
        );
        assert!(records(&e, &a).is_empty());
    }

    #[test]
    fn unboundaried_files_are_unrestricted() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/main.ts", &[("@events", false), ("./other", false)]);
        assert!(records(&e, &a).is_empty());
    }

    #[test]
    fn unboundaried_file_relative_into_boundary_is_rewritten() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/main.ts", &[("./domain/events", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].data.expected_path.as_deref(), Some("@events"));
    }

    #[test]
    fn absolute_style_canonical_path() {
        let e = engine(CrossBoundaryStyle::Absolute);
        let a = analysis(
            "src/domain/queries/get.ts",
            &[("src/domain/entities", false), ("src/domain/entities/army", false)],
        );
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].span.line, 2);
        assert_eq!(
            r[0].data.expected_path.as_deref(),
            Some("src/domain/entities")
        );
    }

    #[test]
    fn unresolvable_relative_import_is_not_reported() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/main.ts", &[("../../../../x", false)]);
        assert!(records(&e, &a).is_empty());
    }

    #[test]
    fn check_file_locates_relative_to_root() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/events/index.ts", &[("@queries", false)]);
        let v = e.check_file(&a);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].code, "BND001");
        assert_eq!(v[0].location.file, PathBuf::from("src/domain/events/index.ts"));
        assert_eq!(v[0].location.column, 21);
        assert_eq!(v[0].severity, Severity::Error);
    }

    #[test]
    fn asset_imports_keep_their_extension() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis(
            "src/domain/queries/get.ts",
            &[
                ("./view.css", false),
                ("./data.json", false),
                ("./assets/logo.svg", false),
            ],
        );
        assert!(records(&e, &a).is_empty());

        let nested = analysis("src/domain/queries/list/all.ts", &[("../assets/logo.svg", false)]);
        assert!(records(&e, &nested).is_empty());
    }

    #[test]
    fn asset_import_through_alias_is_rewritten_verbatim() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis("src/domain/queries/list/all.ts", &[("@queries/view.css", false)]);
        let r = records(&e, &a);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].data.expected_path.as_deref(), Some("../view.css"));
        assert_eq!(r[0].fix.as_ref().map(|f| f.text.as_str()), Some("'../view.css'"));
    }

    #[test]
    fn cross_boundary_asset_import_is_not_rewritten() {
        let e = engine(CrossBoundaryStyle::Alias);
        let a = analysis(
            "src/domain/queries/get.ts",
            &[("@entities/theme.css", false), ("../entities/theme.css", false)],
        );
        assert!(records(&e, &a).is_empty());

        let forbidden = analysis("src/domain/events/index.ts", &[("@queries/view.css", false)]);
        let r = records(&e, &forbidden);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].message_id, MessageId::BoundaryViolation);
    }
}
