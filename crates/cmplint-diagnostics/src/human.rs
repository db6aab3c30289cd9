//! Human-readable diagnostic output formatter.
//!
//! Uses ariadne for rich terminal output with source context.

use crate::diagnostic::{Diagnostic, Severity};
use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use std::collections::HashMap;

/// Format diagnostics for human-readable terminal output.
pub fn format_human(diags: &[Diagnostic], use_color: bool) -> String {
    if diags.is_empty() {
        return "No issues found\n".to_string();
    }

    let mut output = Vec::new();
    let mut source_cache: HashMap<String, String> = HashMap::new();

    let config = Config::default().with_color(use_color);

    for diag in diags {
        let file = &diag.location.file;

        let source_text = source_cache
            .entry(file.clone())
            .or_insert_with(|| std::fs::read_to_string(file).unwrap_or_default());

        if source_text.is_empty() {
            output.push(format_fallback(diag));
            continue;
        }

        let (kind, color) = match diag.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
            Severity::Info => (ReportKind::Advice, Color::Cyan),
        };

        let span = label_span(source_text, diag);

        let report = Report::build(kind, (file.as_str(), span.clone()))
            .with_config(config)
            .with_code(&diag.rule)
            .with_message(&diag.title)
            .with_label(
                Label::new((file.as_str(), span))
                    .with_message(&diag.explanation)
                    .with_color(color),
            );

        let mut buf = Vec::new();
        report
            .finish()
            .write(
                (file.as_str(), Source::from(source_text.as_str())),
                &mut buf,
            )
            .ok();

        output.push(String::from_utf8_lossy(&buf).to_string());
    }

    let errors = diags
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diags
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    output.push(format!(
        "\nFound {} issue(s): {} error, {} warning\n",
        diags.len(),
        errors,
        warnings,
    ));

    output.join("\n")
}

/// Byte range to underline: the whole comparison when it ends on the same line.
fn label_span(source: &str, diag: &Diagnostic) -> std::ops::Range<usize> {
    let loc = &diag.location;
    let start = line_col_to_offset(source, loc.line, loc.column);
    let end = if loc.end_line == loc.line && loc.end_column > loc.column {
        line_col_to_offset(source, loc.end_line, loc.end_column)
    } else {
        start + 1
    };
    start..end.max(start + 1).min(source.len())
}

/// Convert 1-based line:column to byte offset in source text.
fn line_col_to_offset(source: &str, line: u32, col: u32) -> usize {
    let line = line.saturating_sub(1) as usize;
    let col = col.saturating_sub(1) as usize;

    let offset: usize = source
        .lines()
        .take(line)
        .map(|l| l.len() + 1)
        .sum();

    (offset + col).min(source.len().saturating_sub(1))
}

/// Fallback format when source file is not available.
pub fn format_fallback(diag: &Diagnostic) -> String {
    format!(
        "{}: {} [{}] {}\n",
        diag.location, diag.severity, diag.rule, diag.title,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{DiagnosticBuilder, DiagnosticSource};

    fn make_diag(rule: &str, severity: Severity, file: &str, line: u32) -> Diagnostic {
        DiagnosticBuilder::new(rule, severity, format!("test issue {rule}"), DiagnosticSource::Binary)
            .location(file, line, 1)
            .explanation(format!("explanation for {rule}"))
            .build()
    }

    #[test]
    fn test_empty_diagnostics() {
        assert_eq!(format_human(&[], false), "No issues found\n");
    }

    #[test]
    fn test_fallback_no_source() {
        let diag = make_diag("CMP001", Severity::Error, "/nonexistent/file.go", 10);
        let result = format_human(&[diag], false);
        assert_eq!(
            result,
            "/nonexistent/file.go:10:1: error [CMP001] test issue CMP001\n\n\nFound 1 issue(s): 1 error, 0 warning\n"
        );
    }

    #[test]
    fn test_summary_counts() {
        let diags = vec![
            make_diag("CMP001", Severity::Error, "/fake.go", 2),
            make_diag("CMP002", Severity::Warning, "/fake.go", 3),
        ];
        let result = format_human(&diags, false);
        assert!(result.contains("Found 2 issue(s)"));
        assert!(result.contains("1 error"));
        assert!(result.contains("1 warning"));
    }

    #[test]
    fn test_report_with_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.go");
        std::fs::write(&path, "package app\n\nvar ok = err == &MyErr{}\n").unwrap();

        let diag = DiagnosticBuilder::new(
            "CMP001",
            Severity::Error,
            "comparison is always false",
            DiagnosticSource::Binary,
        )
        .location(path.display().to_string(), 3, 10)
        .end_location(3, 25)
        .explanation("new allocation")
        .build();

        let result = format_human(&[diag], false);
        assert!(result.contains("CMP001"));
        assert!(result.contains("comparison is always false"));
        assert!(result.contains("err == &MyErr{}"));
    }

    #[test]
    fn test_line_col_to_offset() {
        let src = "line1\nline2\nline3\n";
        assert_eq!(line_col_to_offset(src, 1, 1), 0);
        assert_eq!(line_col_to_offset(src, 2, 1), 6);
        assert_eq!(line_col_to_offset(src, 2, 3), 8);
        assert_eq!(line_col_to_offset("abc", 100, 1), 2);
    }
}
