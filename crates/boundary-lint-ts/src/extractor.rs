//! Language-agnostic extraction types and trait.
//!
//! `LanguageExtractor` is the extension point for adding new languages.
//! Implement it to teach boundary-lint-ts how to find import statements in
//! a new language via Tree-sitter.

use std::path::PathBuf;

/// A single import (or re-export) statement extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// Line number of the specifier literal (1-indexed).
    pub line: usize,
    /// Column of the specifier literal (0-indexed byte offset within line).
    pub column: usize,
    /// Specifier text without quotes (e.g. `@entities/army`).
    pub specifier: String,
    /// Whether the statement only brings in types.
    pub type_only: bool,
    /// Byte range of the literal, quotes included.
    pub span: (usize, usize),
    /// Quote character used by the literal.
    pub quote: char,
}

impl ImportInfo {
    /// The literal re-quoted around a new specifier.
    #[must_use]
    pub fn quoted(&self, specifier: &str) -> String {
        format!("{q}{specifier}{q}", q = self.quote)
    }
}

/// Result of analyzing a single source file with Tree-sitter.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// Absolute path of the analyzed file.
    pub file_path: PathBuf,
    /// All import statements found, in source order.
    pub imports: Vec<ImportInfo>,
}

/// Errors raised while parsing source.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader message.
        message: String,
    },
    /// The parser produced no tree.
    #[error("failed to parse {language} source")]
    Parse {
        /// Language identifier.
        language: &'static str,
    },
}

/// Trait for language-specific Tree-sitter extraction.
///
/// The extractor receives raw source text and returns a [`FileAnalysis`]
/// whose `file_path` the caller fills in.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".ts", ".mts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract import statements from source code.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the grammar cannot be loaded or parsing
    /// yields no tree.
    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError>;
}
