//! Decision core: picks the allocated operand and reports the comparison.

use cmplint_diagnostics::diagnostic::DiagnosticSource;
use cmplint_ir::ir::Expr;
use cmplint_ir::printer::render;

use crate::alloc::recognize;
use crate::analysis::{Pass, PassResult};
use crate::catalog::Catalog;
use crate::rules;
use crate::suppress::should_suppress;
use crate::zerosized::is_zero_sized;

/// Per-pass state shared by the node handlers.
pub(crate) struct Checker<'p, 'a> {
    pub(crate) pass: &'p Pass<'a>,
    pub(crate) catalog: &'p Catalog,
    check_is: bool,
    result: PassResult,
}

impl<'p, 'a> Checker<'p, 'a> {
    pub(crate) fn new(pass: &'p Pass<'a>, catalog: &'p Catalog, check_is: bool) -> Self {
        Self {
            pass,
            catalog,
            check_is,
            result: PassResult::default(),
        }
    }

    pub(crate) fn finish(self) -> PassResult {
        self.result
    }

    pub(crate) fn report_internal(&mut self, diag: cmplint_diagnostics::Diagnostic) {
        self.result.internal.push(diag);
    }

    /// Check a comparison of `left` and `right`, reported at `node`.
    ///
    /// The left operand is tried first; when both sides are allocations
    /// the left one is reported.
    pub(crate) fn comparison(
        &mut self,
        node: &Expr,
        left: &Expr,
        right: &Expr,
        is_error: bool,
        source: DiagnosticSource,
    ) {
        let info = self.pass.info;
        let types = self.pass.types;

        let (site, other, is_left) = if let Some(site) = recognize(left, info) {
            (site, right, true)
        } else if let Some(site) = recognize(right, info) {
            (site, left, false)
        } else {
            return;
        };

        if let Some(t) = site.element_type {
            if is_error && self.check_is && should_suppress(types, t, is_left) {
                tracing::debug!(node = %node.id, is_left, "comparison suppressed by Is/Unwrap method");
                return;
            }
        }

        // Pointers to distinct zero-sized variables may compare equal,
        // unless the other side is nil.
        let undefined = site.element_type.is_some_and(|t| is_zero_sized(types, t))
            && !info
                .type_and_value(other.id)
                .is_some_and(|tv| tv.is_nil());

        let type_name = match site.element_type {
            Some(t) => types.type_string(t, &self.pass.package.import_path),
            None => "invalid type".to_string(),
        };

        let other_text = render(other).unwrap_or_else(|err| {
            tracing::debug!(node = %other.id, error = %err, "operand not renderable");
            "invalid".to_string()
        });

        let diag = if undefined {
            rules::build_cmp002(node, &other_text, &type_name, source)
        } else {
            rules::build_cmp001(node, &other_text, &type_name, source)
        };
        self.result.diagnostics.push(diag);
    }
}
