//! TypeScript language extractor using Tree-sitter.

use tree_sitter::{Language, Node, Parser};

use crate::extractor::{ExtractError, FileAnalysis, ImportInfo, LanguageExtractor};

/// Extracts `import` and `export ... from` statements from TypeScript source.
///
/// Only top-level static statements are collected. Dynamic `import('...')`
/// calls and `import x = require('...')` declarations are not extracted and
/// so are never checked against boundaries.
pub struct TypeScriptExtractor {
    language: Language,
    tsx: bool,
}

impl TypeScriptExtractor {
    /// Creates an extractor for `.ts`, `.mts` and `.cts` files.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: false,
        }
    }

    /// Creates an extractor for `.tsx` files.
    #[must_use]
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            tsx: true,
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
    }

    fn has_child_kind(node: &Node<'_>, kind: &str) -> bool {
        let mut cursor = node.walk();
        let found = node.children(&mut cursor).any(|c| c.kind() == kind);
        found
    }

    /// `import { type A, type B }` with no default or namespace binding.
    fn all_named_are_types(clause: &Node<'_>, list_kind: &str, item_kind: &str) -> bool {
        let mut saw_item = false;
        let mut cursor = clause.walk();
        for child in clause.children(&mut cursor) {
            match child.kind() {
                k if k == list_kind => {
                    let mut inner = child.walk();
                    for item in child.children(&mut inner) {
                        if item.kind() != item_kind {
                            continue;
                        }
                        if !Self::has_child_kind(&item, "type") {
                            return false;
                        }
                        saw_item = true;
                    }
                }
                "identifier" | "namespace_import" => return false,
                _ => {}
            }
        }
        saw_item
    }

    /// `export type * from '...'` parses with the `type` keyword inside an
    /// `ERROR` node right after `export`.
    fn export_keyword_is_type(node: &Node<'_>, src: &[u8]) -> bool {
        let mut cursor = node.walk();
        let mut children = node.children(&mut cursor).skip_while(|c| c.kind() != "export");
        let Some(next) = children.nth(1) else {
            return false;
        };
        match next.kind() {
            "type" => true,
            "ERROR" => Self::text(&next, src)
                .trim_start()
                .strip_prefix("type")
                .is_some_and(|rest| {
                    !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$')
                }),
            _ => false,
        }
    }

    fn is_type_only(node: &Node<'_>, src: &[u8]) -> bool {
        if Self::has_child_kind(node, "type") {
            return true;
        }
        if node.kind() == "export_statement" && Self::export_keyword_is_type(node, src) {
            return true;
        }
        let mut cursor = node.walk();
        let mut children = node.children(&mut cursor);
        match node.kind() {
            "import_statement" => children
                .find(|c| c.kind() == "import_clause")
                .is_some_and(|clause| {
                    Self::all_named_are_types(&clause, "named_imports", "import_specifier")
                }),
            "export_statement" => children
                .find(|c| c.kind() == "export_clause")
                .is_some_and(|clause| Self::export_clause_is_types(&clause)),
            _ => false,
        }
    }

    fn export_clause_is_types(clause: &Node<'_>) -> bool {
        let mut saw_item = false;
        let mut cursor = clause.walk();
        for item in clause.children(&mut cursor) {
            if item.kind() != "export_specifier" {
                continue;
            }
            if !Self::has_child_kind(&item, "type") {
                return false;
            }
            saw_item = true;
        }
        saw_item
    }

    fn extract_import(node: &Node<'_>, src: &[u8]) -> Option<ImportInfo> {
        let source = node.child_by_field_name("source")?;
        let literal = Self::text(&source, src);
        let quote = literal.chars().next()?;
        if literal.len() < 2 || !(quote == '"' || quote == '\'') {
            return None;
        }
        let start = source.start_position();
        Some(ImportInfo {
            line: start.row + 1,
            column: start.column,
            specifier: literal[1..literal.len() - 1].to_owned(),
            type_only: Self::is_type_only(node, src),
            span: (source.start_byte(), source.end_byte()),
            quote,
        })
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        if self.tsx {
            "tsx"
        } else {
            "typescript"
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        if self.tsx {
            &[".tsx"]
        } else {
            &[".ts", ".mts", ".cts"]
        }
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let language = self.language_id();
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Language {
                language,
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or(ExtractError::Parse { language })?;
        let root = tree.root_node();

        let mut result = FileAnalysis::default();

        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            match node.kind() {
                "import_statement" | "export_statement" => {
                    if let Some(imp) = Self::extract_import(&node, src) {
                        result.imports.push(imp);
                    }
                }
                _ => {}
            }
        }

        Ok(result)
    }
}
