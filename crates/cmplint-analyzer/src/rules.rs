//! Comparison rules (CMP001, CMP002) and internal reports (CMP900).

use cmplint_diagnostics::diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticSource, Severity};
use cmplint_ir::ir::{Expr, Span};

use crate::catalog::{ComparisonShape, FuncName};

/// CMP001: comparison with the address of a new variable is always false
pub fn build_cmp001(node: &Expr, other: &str, type_name: &str, source: DiagnosticSource) -> Diagnostic {
    let title = format!(
        "Result of comparison of {} with address of new variable of type {} is always false",
        go_quote(other),
        go_quote(type_name),
    );
    with_span(
        DiagnosticBuilder::new("CMP001", Severity::Error, title, source),
        &node.span,
    )
    .confidence(0.95)
    .explanation(format!(
        "each evaluation of `&{type_name}{{}}` or `new({type_name})` creates a distinct variable, so its address never equals `{other}`"
    ))
    .build()
}

/// CMP002: comparison with the address of a new zero-sized variable is false or undefined
pub fn build_cmp002(node: &Expr, other: &str, type_name: &str, source: DiagnosticSource) -> Diagnostic {
    let title = format!(
        "Result of comparison of {} with address of new zero-sized variable of type {} is false or undefined",
        go_quote(other),
        go_quote(type_name),
    );
    with_span(
        DiagnosticBuilder::new("CMP002", Severity::Warning, title, source),
        &node.span,
    )
    .confidence(0.8)
    .explanation(format!(
        "pointers to distinct zero-sized variables may or may not be equal; comparing `{other}` against a new `{type_name}` is unreliable"
    ))
    .build()
}

/// CMP900: a call matched a catalog entry but cannot have the catalogued shape
pub fn build_cmp900(node: &Expr, func: &FuncName, shape: ComparisonShape, got: usize, want: usize) -> Diagnostic {
    with_span(
        DiagnosticBuilder::new(
            "CMP900",
            Severity::Info,
            format!("call to {func} has {got} argument(s), catalog shape {shape:?} needs {want}"),
            DiagnosticSource::Internal,
        ),
        &node.span,
    )
    .confidence(1.0)
    .explanation("the catalog entry does not match this function; the call was skipped")
    .build()
}

fn with_span(builder: DiagnosticBuilder, span: &Option<Span>) -> DiagnosticBuilder {
    match span {
        Some(s) => builder
            .location(&s.file, s.start_line, s.start_col)
            .end_location(s.end_line.max(s.start_line), s.end_col),
        None => builder,
    }
}

/// Double-quoted Go string literal, as produced by `%q`.
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
