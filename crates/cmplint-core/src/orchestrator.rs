//! Analysis orchestrator: runs the analyzer over every package and
//! post-processes the results.

use crate::config::Config;
use cmplint_analyzer::{Analyzer, AnalyzerError, PassResult};
use cmplint_diagnostics::diagnostic::{AnalysisSummary, Diagnostic, Severity};
use cmplint_ir::ir::AnalysisInput;
use cmplint_ir::IrError;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

/// Complete output from an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub diagnostics: Vec<Diagnostic>,
    /// Tool-internal reports; never filtered by severity.
    pub internal: Vec<Diagnostic>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Input(#[from] IrError),
    #[error("analysis of package {package} failed: {source}")]
    Analyzer {
        package: String,
        #[source]
        source: AnalyzerError,
    },
}

/// Load a frontend JSON file and analyze it.
pub fn analyze_file(path: &Path, config: &Config) -> Result<AnalysisOutput, OrchestratorError> {
    let ir = cmplint_ir::load_json_file(path)?;
    analyze_ir(&ir, config)
}

/// Run the analyzer on already-loaded input.
pub fn analyze_ir(ir: &AnalysisInput, config: &Config) -> Result<AnalysisOutput, OrchestratorError> {
    let analyzer = config.analyzer.analyzer();
    analyze_with(&analyzer, ir, config)
}

/// Run a specific analyzer instance on already-loaded input.
pub fn analyze_with(
    analyzer: &Analyzer,
    ir: &AnalysisInput,
    config: &Config,
) -> Result<AnalysisOutput, OrchestratorError> {
    let start = Instant::now();
    let mut result = PassResult::default();

    for pkg in &ir.packages {
        let pass = analyzer
            .run_package(pkg)
            .map_err(|source| OrchestratorError::Analyzer {
                package: pkg.import_path.clone(),
                source,
            })?;
        tracing::debug!(
            package = %pkg.import_path,
            diagnostics = pass.diagnostics.len(),
            "analyzed package"
        );
        result.extend(pass);
    }

    if config.cmplint.skip_generated {
        let generated: HashSet<&str> = ir
            .packages
            .iter()
            .flat_map(|p| &p.files)
            .filter(|f| f.is_generated)
            .map(|f| f.path.as_str())
            .collect();
        if !generated.is_empty() {
            result
                .diagnostics
                .retain(|d| !generated.contains(d.location.file.as_str()));
            result
                .internal
                .retain(|d| !generated.contains(d.location.file.as_str()));
        }
    }

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(postprocess_diagnostics(result, config, ir.packages.len(), elapsed))
}

/// Severity filter, sort, truncate, build summary.
fn postprocess_diagnostics(
    result: PassResult,
    config: &Config,
    packages: usize,
    elapsed_ms: u64,
) -> AnalysisOutput {
    let PassResult {
        mut diagnostics,
        internal,
    } = result;

    let threshold = parse_severity(&config.cmplint.severity_threshold);
    diagnostics.retain(|d| d.severity.is_at_least(threshold));

    // Stable: comparisons on one line keep traversal order.
    diagnostics.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.location.column.cmp(&b.location.column))
    });

    let max = config.cmplint.max_diagnostics;
    if max > 0 && diagnostics.len() > max {
        tracing::info!(total = diagnostics.len(), max, "truncating diagnostics");
        diagnostics.truncate(max);
    }

    let summary = AnalysisSummary::from_diagnostics(&diagnostics, packages, elapsed_ms);
    AnalysisOutput {
        diagnostics,
        internal,
        summary,
    }
}

fn parse_severity(s: &str) -> Severity {
    s.parse().unwrap_or_else(|err: String| {
        tracing::warn!(error = %err, "falling back to warning threshold");
        Severity::Warning
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmplint_ir::builder::PackageBuilder;
    use cmplint_ir::ir::BinaryOp;

    /// Two files; `gen.go` is generated. Each has one always-false and
    /// one zero-sized comparison.
    fn input() -> AnalysisInput {
        let mut b = PackageBuilder::new("example.com/app");
        let st = b.struct_type(vec![PackageBuilder::field("Msg", b.string_type())]);
        let my_err = b.named("MyErr", st);
        let st = b.struct_type(vec![]);
        let empty = b.named("Empty", st);
        let err_ty = b.error_type();

        for file in ["b.go", "gen.go", "a.go"] {
            b.file(file);
            if file == "gen.go" {
                b.generated();
            }
            for ty in [empty, my_err] {
                let err = b.var("err", err_ty);
                let lit = b.addr_of_composite(ty);
                let cmp = b.binary(BinaryOp::Neq, err, lit);
                b.stmt(cmp);
            }
        }
        b.build_input()
    }

    #[test]
    fn test_analyze_fixture() {
        let ir = cmplint_ir::load_fixture("errors_is");
        let output = analyze_ir(&ir, &Config::default()).unwrap();
        assert_eq!(output.summary.error, 1);
        assert_eq!(output.summary.warning, 1);
        assert_eq!(output.summary.packages, 1);
        assert!(output.internal.is_empty());
    }

    #[test]
    fn test_skip_generated() {
        let ir = input();
        let output = analyze_ir(&ir, &Config::default()).unwrap();
        assert_eq!(output.diagnostics.len(), 4);
        assert!(output.diagnostics.iter().all(|d| d.location.file != "gen.go"));

        let mut config = Config::default();
        config.cmplint.skip_generated = false;
        let output = analyze_ir(&ir, &config).unwrap();
        assert_eq!(output.diagnostics.len(), 6);
    }

    #[test]
    fn test_sorted_output() {
        let output = analyze_ir(&input(), &Config::default()).unwrap();
        let order: Vec<(String, u32)> = output
            .diagnostics
            .iter()
            .map(|d| (d.location.file.clone(), d.location.line))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.go".to_string(), 1),
                ("a.go".to_string(), 2),
                ("b.go".to_string(), 1),
                ("b.go".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_severity_filter() {
        let mut config = Config::default();
        config.cmplint.severity_threshold = "error".to_string();
        let output = analyze_ir(&input(), &config).unwrap();
        assert_eq!(output.diagnostics.len(), 2);
        assert!(output
            .diagnostics
            .iter()
            .all(|d| d.severity.is_at_least(Severity::Error)));
        assert_eq!(output.summary.warning, 0);
    }

    #[test]
    fn test_max_diagnostics() {
        let mut config = Config::default();
        config.cmplint.max_diagnostics = 3;
        let output = analyze_ir(&input(), &config).unwrap();
        assert_eq!(output.diagnostics.len(), 3);
        assert_eq!(output.summary.total(), 3);

        config.cmplint.max_diagnostics = 0;
        let output = analyze_ir(&input(), &config).unwrap();
        assert_eq!(output.diagnostics.len(), 4);
    }

    #[test]
    fn test_check_is_from_config() {
        let ir = cmplint_ir::load_fixture("errors_is");
        let mut config = Config::default();
        config.analyzer.check_is = false;
        let output = analyze_ir(&ir, &config).unwrap();
        assert_eq!(output.summary.total(), 3);
    }

    #[test]
    fn test_analyze_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze_file(&dir.path().join("missing.json"), &Config::default()).unwrap_err();
        assert!(matches!(err, OrchestratorError::Input(IrError::Io { .. })));
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("error"), Severity::Error);
        assert_eq!(parse_severity("Info"), Severity::Info);
        assert_eq!(parse_severity("bogus"), Severity::Warning);
    }
}
