//! Reporter interface between the boundary engine and its host.
//!
//! The engine never keeps what it finds: each violation is built as a
//! [`ViolationRecord`] and handed to a [`Reporter`] exactly once.
//! [`ResultReporter`] is the stock sink that turns records into
//! [`Violation`]s for a [`LintResult`](crate::LintResult).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{Location, Replacement, Severity, Suggestion, Violation};

/// Taxonomy tag of a reported violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageId {
    /// A boundary imports from a boundary its allow-lists do not name.
    BoundaryViolation,
    /// The import specifier is not written in its canonical form.
    IncorrectImportPath,
    /// A file reaches for a barrel of its own boundary or directory.
    AncestorBarrelImport,
}

impl MessageId {
    /// Stable message id, as written in reports (e.g. `"boundaryViolation"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BoundaryViolation => "boundaryViolation",
            Self::IncorrectImportPath => "incorrectImportPath",
            Self::AncestorBarrelImport => "ancestorBarrelImport",
        }
    }

    /// Rule code (e.g. `"BND001"`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::BoundaryViolation => "BND001",
            Self::IncorrectImportPath => "BND002",
            Self::AncestorBarrelImport => "BND003",
        }
    }

    /// Kebab-case rule name.
    #[must_use]
    pub fn rule(self) -> &'static str {
        match self {
            Self::BoundaryViolation => "boundary-violation",
            Self::IncorrectImportPath => "incorrect-import-path",
            Self::AncestorBarrelImport => "ancestor-barrel-import",
        }
    }

    /// Renders the user-facing message for this id.
    #[must_use]
    pub fn render(self, data: &ViolationData) -> String {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        match self {
            Self::BoundaryViolation => {
                let mut msg = format!(
                    "Cannot import from '{}' to '{}'",
                    field(&data.to),
                    field(&data.from)
                );
                if let Some(reason) = &data.reason {
                    msg.push_str(": ");
                    msg.push_str(reason);
                }
                msg
            }
            Self::IncorrectImportPath => format!(
                "Expected '{}' but got '{}'",
                field(&data.expected_path),
                field(&data.actual_path)
            ),
            Self::AncestorBarrelImport => {
                let target = data.alias.clone().or_else(|| data.path.clone());
                format!(
                    "Do not import from ancestor barrel '{}'. Import the specific module instead",
                    target.unwrap_or_default()
                )
            }
        }
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields of a violation record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationData {
    /// Importing side (boundary alias or path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Imported side (boundary alias or path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Canonical specifier that should have been written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_path: Option<String>,
    /// Specifier as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_path: Option<String>,
    /// Boundary alias involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Path involved, when no alias applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Extra explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Position of the reported node (the import specifier literal).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpan {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset of the node.
    pub offset: usize,
    /// Byte length of the node.
    pub length: usize,
}

/// Text replacement over a byte range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Replacement text.
    pub text: String,
    /// Byte range replaced.
    pub range: (usize, usize),
}

impl Fix {
    /// Creates a fix replacing `range` with `text`.
    #[must_use]
    pub fn new(range: (usize, usize), text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }
}

/// One violation as produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Taxonomy tag.
    pub message_id: MessageId,
    /// Reported node.
    pub span: NodeSpan,
    /// Structured data for the message.
    pub data: ViolationData,
    /// Severity override; the reporter's default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Optional autofix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl ViolationRecord {
    /// Creates a record without severity override or fix.
    #[must_use]
    pub fn new(message_id: MessageId, span: NodeSpan, data: ViolationData) -> Self {
        Self {
            message_id,
            span,
            data,
            severity: None,
            fix: None,
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Attaches an autofix.
    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Renders the user-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        self.message_id.render(&self.data)
    }
}

/// Receives violation records from the engine.
pub trait Reporter {
    /// Records one violation.
    fn report(&mut self, record: ViolationRecord);
}

impl Reporter for Vec<ViolationRecord> {
    fn report(&mut self, record: ViolationRecord) {
        self.push(record);
    }
}

/// Converts records into [`Violation`]s located in one file.
#[derive(Debug)]
pub struct ResultReporter {
    file: PathBuf,
    default_severity: Severity,
    violations: Vec<Violation>,
}

impl ResultReporter {
    /// Creates a reporter for `file` (path as it should appear in output).
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, default_severity: Severity) -> Self {
        Self {
            file: file.into(),
            default_severity,
            violations: Vec::new(),
        }
    }

    /// Consumes the reporter, returning collected violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl Reporter for ResultReporter {
    fn report(&mut self, record: ViolationRecord) {
        let id = record.message_id;
        let location = Location::new(self.file.clone(), record.span.line, record.span.column)
            .with_span(record.span.offset, record.span.length);
        let mut violation = Violation::new(
            id.code(),
            id.rule(),
            record.severity.unwrap_or(self.default_severity),
            location,
            record.message(),
        );

        if let Some(fix) = record.fix {
            let (start, end) = fix.range;
            let fix_location = Location::new(self.file.clone(), record.span.line, record.span.column)
                .with_span(start, end.saturating_sub(start));
            let help = match &record.data.expected_path {
                Some(expected) => format!("Replace with '{expected}'"),
                None => format!("Replace with {}", fix.text),
            };
            violation = violation
                .with_suggestion(Suggestion::with_fix(help, Replacement::new(fix_location, fix.text)));
        } else if id == MessageId::AncestorBarrelImport {
            violation = violation.with_suggestion(Suggestion::new(
                "Import the module directly with a relative path",
            ));
        }

        self.violations.push(violation);
    }
}
