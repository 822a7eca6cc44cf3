//! Shared output formatting for lint results.

use anyhow::{Context, Result};
use layout_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` locates the files behind the relative paths of violations.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root),
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
            let fixable = if suggestion.is_fixable() { " [fixable]" } else { "" };
            println!("  = help: {}{fixable}", suggestion.message);
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

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );

    let fixable = result.fixable_count();
    if result.files_fixed > 0 {
        println!("Fixed {} file(s)", result.files_fixed);
    } else if fixable > 0 {
        println!("{fixable} violation(s) can be fixed with --fix");
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("Failed to serialize results")?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        println!("{:?}", report(violation, root));
    }
    print_summary(result);
}

/// Renders a violation against its source file, or without source if unreadable.
fn report(violation: &Violation, root: &Path) -> Report {
    let diagnostic = Report::new(ViolationDiagnostic::from(violation));
    let file = &violation.location.file;
    let full_path = if file.is_absolute() { file.clone() } else { root.join(file) };

    match std::fs::read_to_string(&full_path) {
        Ok(content) => {
            diagnostic.with_source_code(NamedSource::new(file.display().to_string(), content))
        }
        Err(e) => {
            tracing::debug!("Cannot read {} for rendering: {}", full_path.display(), e);
            diagnostic
        }
    }
}
