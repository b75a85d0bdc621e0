//! Output formatting for lint results.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use boundary_lint_core::{LintResult, Severity, ViolationDiagnostic};
use miette::GraphicalReportHandler;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `sources` maps each violation's file (as it appears in the location) to
/// its text; only the `pretty` format reads it.
pub fn print(
    result: &LintResult,
    format: OutputFormat,
    sources: &HashMap<PathBuf, String>,
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => return print_pretty(result, sources),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }
    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{summary_color}{}\x1b[0m", summary_line(result, errors, warnings, infos));

    let fixable = result.fixable_count();
    if fixable > 0 {
        println!("{fixable} violation(s) can be fixed with `boundary-lint check --fix`");
    }
}

fn summary_line(result: &LintResult, errors: usize, warnings: usize, infos: usize) -> String {
    let mut line = format!(
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
        result.files_checked
    );
    if result.fixes_applied > 0 {
        line.push_str(&format!(", fixed {} import(s)", result.fixes_applied));
    }
    line
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, sources: &HashMap<PathBuf, String>) -> Result<()> {
    let handler = GraphicalReportHandler::new();
    for violation in &result.violations {
        let source = sources
            .get(&violation.location.file)
            .cloned()
            .unwrap_or_default();
        let diagnostic = ViolationDiagnostic::new(violation, source);
        let mut rendered = String::new();
        handler.render_report(&mut rendered, &diagnostic)?;
        println!("{rendered}");
    }
    print_summary(result);
    Ok(())
}
