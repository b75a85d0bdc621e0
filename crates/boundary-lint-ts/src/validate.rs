//! Allow-list policy for cross-boundary imports.

use boundary_lint_core::{MessageId, NodeSpan, Reporter, Severity, ViolationData, ViolationRecord};
use tracing::debug;

use crate::boundary::Boundary;

/// Inputs for one policy decision.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryCheck<'a> {
    /// Boundary of the importing file.
    pub file_boundary: Option<&'a Boundary>,
    /// Boundary of the resolved target.
    pub target_boundary: Option<&'a Boundary>,
    /// Whether the import only brings in types.
    pub is_type_only: bool,
    /// Node reported on violation.
    pub span: NodeSpan,
    /// Severity attached to the record.
    pub severity: Option<Severity>,
}

/// Reports a `boundaryViolation` if the import is not allowed.
///
/// Returns `true` iff a violation was reported. An alias in
/// `allow_imports_from` admits value and type imports; an alias only in
/// `allow_type_imports_from` admits type-only imports.
pub fn validate_boundary_rules(check: &BoundaryCheck<'_>, reporter: &mut dyn Reporter) -> bool {
    let (Some(from), Some(to)) = (check.file_boundary, check.target_boundary) else {
        return false;
    };
    if from.alias == to.alias {
        return false;
    }
    if from.allows(&to.alias) {
        return false;
    }
    let type_allowed = from.allows_types(&to.alias);
    if check.is_type_only && type_allowed {
        debug!(from = %from.alias, to = %to.alias, "type-only import allowed");
        return false;
    }

    let reason = type_allowed.then(|| {
        format!(
            "only type imports are allowed from '{}'; use `import type`",
            to.alias
        )
    });
    let data = ViolationData {
        from: Some(from.alias.clone()),
        to: Some(to.alias.clone()),
        reason,
        ..ViolationData::default()
    };
    let mut record = ViolationRecord::new(MessageId::BoundaryViolation, check.span, data);
    if let Some(severity) = check.severity {
        record = record.with_severity(severity);
    }
    reporter.report(record);
    true
}
