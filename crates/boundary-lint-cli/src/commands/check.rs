//! Check command implementation.

use anyhow::{Context, Result};
use boundary_lint_core::{LintResult, Violation};
use boundary_lint_ts::{BoundaryRuleEngine, LanguageExtractor, TypeScriptExtractor};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command. Returns whether any error-severity violation
/// remains.
pub fn run(path: &Path, format: OutputFormat, fix: bool, source: &ConfigSource) -> Result<bool> {
    let config = source.load()?;

    let root = if config.root.is_absolute() {
        config.root.clone()
    } else {
        path.join(&config.root)
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Project root not found: {}", root.display()))?;

    let engine = BoundaryRuleEngine::new(&config, &root);
    let extractors: Vec<Box<dyn LanguageExtractor>> = vec![
        Box::new(TypeScriptExtractor::new()),
        Box::new(TypeScriptExtractor::tsx()),
    ];

    let files = discover_files(&root, &config.exclude, &extractors)?;
    tracing::info!(
        "Checking {} files against {} boundaries",
        files.len(),
        engine.registry().boundaries().len()
    );

    let mut result = LintResult::new();
    let mut sources: HashMap<PathBuf, String> = HashMap::new();

    for file_path in &files {
        let Some(extractor) = extractor_for(file_path, &extractors) else {
            continue;
        };
        let mut text = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;

        let Some(mut violations) = check_source(&engine, extractor, file_path, &text) else {
            continue;
        };

        if fix && violations.iter().any(|v| v.replacement().is_some()) {
            let (fixed, applied) = super::fix::apply(&text, &violations);
            std::fs::write(file_path, &fixed)
                .with_context(|| format!("Failed to write {}", file_path.display()))?;
            tracing::info!("Fixed {} import(s) in {}", applied, file_path.display());
            result.fixes_applied += applied;
            text = fixed;
            violations = check_source(&engine, extractor, file_path, &text).unwrap_or_default();
        }

        result.files_checked += 1;
        if let Some(first) = violations.first() {
            sources.insert(first.location.file.clone(), text);
        }
        result.violations.extend(violations);
    }

    result.sort();
    super::output::print(&result, format, &sources)?;

    Ok(result.has_errors())
}

fn check_source(
    engine: &BoundaryRuleEngine,
    extractor: &dyn LanguageExtractor,
    file_path: &Path,
    text: &str,
) -> Option<Vec<Violation>> {
    match extractor.analyze(text) {
        Ok(mut analysis) => {
            analysis.file_path = file_path.to_path_buf();
            Some(engine.check_file(&analysis))
        }
        Err(e) => {
            tracing::warn!("Skipping {}: {e}", file_path.display());
            None
        }
    }
}

fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

fn extractor_for<'a>(
    path: &Path,
    extractors: &'a [Box<dyn LanguageExtractor>],
) -> Option<&'a dyn LanguageExtractor> {
    let ext = dotted_extension(path);
    extractors
        .iter()
        .find(|e| e.extensions().contains(&ext.as_str()))
        .map(|e| e.as_ref())
}

/// Whether `rel` matches an `exclude` pattern. Only the `**/` and `/**`
/// wildcards are understood; the rest is matched as a substring.
fn is_excluded(rel: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|pattern| {
        let clean = pattern.replace("**/", "").replace("/**", "");
        !clean.is_empty() && rel.contains(&clean)
    })
}

fn discover_files(
    root: &Path,
    exclude: &[String],
    extractors: &[Box<dyn LanguageExtractor>],
) -> Result<Vec<PathBuf>> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || extractor_for(path, extractors).is_none() {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
        if !is_excluded(&rel, exclude) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
