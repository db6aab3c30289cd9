//! Core diagnostic types for cmplint.
//!
//! The analyzer produces `Diagnostic` values, and the formatters (human,
//! JSON) consume them.

use serde::{Deserialize, Serialize};

/// A diagnostic produced by an analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique ID: RULE_CODE-file:line (e.g., "CMP001-handler.go:18").
    pub id: String,
    /// Rule code (e.g., "CMP001").
    pub rule: String,
    pub severity: Severity,
    /// Analysis confidence (0.0 to 1.0).
    pub confidence: f64,
    /// One-line message.
    pub title: String,
    /// Detailed explanation of why this is a bug.
    pub explanation: String,
    /// The comparison expression the diagnostic is attached to.
    pub location: Location,
    /// The analysis pass that produced this diagnostic.
    pub source: DiagnosticSource,
}

/// Severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown severity '{other}' (expected info, warning or error)"
            )),
        }
    }
}

impl Severity {
    /// Check if this severity is at or above a threshold.
    pub fn is_at_least(&self, threshold: Severity) -> bool {
        *self >= threshold
    }
}

/// Source code location.
///
/// Lines and columns are 1-based (matching Go's `token.Position`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Which part of the analyzer produced the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSource {
    /// `==` / `!=` operators.
    Binary,
    /// Catalogued comparison functions (`errors.Is`, assertion helpers).
    Call,
    /// Tool-internal consistency reports.
    Internal,
}

impl std::fmt::Display for DiagnosticSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Call => write!(f, "call"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Builder for creating diagnostics conveniently.
pub struct DiagnosticBuilder {
    rule: String,
    severity: Severity,
    title: String,
    file: String,
    line: u32,
    column: u32,
    end_line: u32,
    end_column: u32,
    source: DiagnosticSource,
    confidence: f64,
    explanation: String,
}

impl DiagnosticBuilder {
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
        source: DiagnosticSource,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            title: title.into(),
            file: String::new(),
            line: 0,
            column: 0,
            end_line: 0,
            end_column: 0,
            source,
            confidence: 0.9,
            explanation: String::new(),
        }
    }

    /// Set the location.
    pub fn location(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self.column = column;
        self.end_line = line;
        self.end_column = column;
        self
    }

    pub fn end_location(mut self, end_line: u32, end_column: u32) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Build the diagnostic.
    pub fn build(self) -> Diagnostic {
        let id = format!("{}-{}:{}", self.rule, self.file, self.line);
        Diagnostic {
            id,
            rule: self.rule,
            severity: self.severity,
            confidence: self.confidence,
            title: self.title,
            explanation: self.explanation,
            location: Location {
                file: self.file,
                line: self.line,
                column: self.column,
                end_line: self.end_line,
                end_column: self.end_column,
            },
            source: self.source,
        }
    }
}

/// Summary of analysis results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub packages: usize,
    pub analysis_time_ms: u64,
}

impl AnalysisSummary {
    /// Create a summary from a list of diagnostics.
    pub fn from_diagnostics(diagnostics: &[Diagnostic], packages: usize, analysis_time_ms: u64) -> Self {
        let mut summary = Self {
            error: 0,
            warning: 0,
            info: 0,
            packages,
            analysis_time_ms,
        };

        for diag in diagnostics {
            match diag.severity {
                Severity::Error => summary.error += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
        }

        summary
    }

    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }
}
