//! # boundary-lint-core
//!
//! Shared types for boundary linting.
//!
//! This crate holds what the engine and its hosts exchange:
//!
//! - [`Violation`], [`Severity`], [`Location`] and [`LintResult`] for findings
//! - [`Suggestion`] / [`Replacement`] for autofixes
//! - [`Reporter`] and [`ViolationRecord`], the reporting interface the
//!   boundary engine writes to
//! - [`ResultReporter`], which turns records into violations

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod report;
mod types;

pub use report::{
    Fix, MessageId, NodeSpan, Reporter, ResultReporter, ViolationData, ViolationRecord,
};
pub use types::{
    LintResult, Location, Replacement, Severity, Suggestion, Violation, ViolationDiagnostic,
};
