//! # boundary-lint-ts
//!
//! Tree-sitter based import-boundary enforcement for TypeScript projects.
//!
//! A project declares boundaries (directories with an import alias and
//! allow-lists). For every import statement this crate resolves the
//! specifier, finds which boundary each side belongs to, and reports:
//!
//! - imports into boundaries that are not allowed (`boundaryViolation`)
//! - imports not written in their canonical form (`incorrectImportPath`)
//! - imports of a file's own boundary barrel or an ancestor barrel
//!   (`ancestorBarrelImport`)
//!
//! It reuses `boundary-lint-core` types (`Violation`, `Severity`, the
//! [`Reporter`](boundary_lint_core::Reporter) seam) and adds:
//!
//! - [`LanguageExtractor`] trait for pluggable language support
//! - [`TypeScriptExtractor`] for `.ts`/`.tsx` import extraction
//! - [`BoundaryRegistry`] for path-to-boundary membership
//! - [`BoundaryRuleEngine`] tying resolution and policy together
//! - [`BoundaryConfig`] for TOML-based boundary definitions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod boundary;
pub mod calculate;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod paths;
pub mod relationship;
pub mod resolve;
pub mod typescript;
pub mod validate;

pub use boundary::{Boundary, BoundaryRegistry};
pub use config::{BoundaryConfig, ConfigError, CrossBoundaryStyle};
pub use engine::BoundaryRuleEngine;
pub use extractor::{ExtractError, FileAnalysis, ImportInfo, LanguageExtractor};
pub use resolve::{FileProbe, FsProbe, ResolutionError};
pub use typescript::TypeScriptExtractor;
