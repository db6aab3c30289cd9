//! Comparison classifier: turns binary and call nodes into operand pairs.

use cmplint_diagnostics::diagnostic::DiagnosticSource;
use cmplint_ir::ir::{Expr, ExprKind, Object, ObjectKind, SelectionKind, TypeKind};

use crate::catalog::FuncName;
use crate::cmp::Checker;
use crate::rules;

impl Checker<'_, '_> {
    /// `x == y` and `x != y`.
    pub(crate) fn handle_binary(&mut self, node: &Expr) {
        let ExprKind::Binary { op, x, y } = &node.kind else {
            return;
        };
        if op.is_equality() {
            self.comparison(node, x, y, false, DiagnosticSource::Binary);
        }
    }

    /// Calls to catalogued comparison functions.
    pub(crate) fn handle_call(&mut self, node: &Expr) {
        let ExprKind::Call { fun, args, .. } = &node.kind else {
            return;
        };
        let Some((func, offset)) = self.resolve_callee(fun) else {
            return;
        };
        let Some(shape) = self.catalog.get(&func) else {
            return;
        };

        // f(g()) passes all results of g; the operands are not expressions here.
        if let [arg] = args.as_slice() {
            if self.is_tuple(arg) {
                tracing::debug!(node = %node.id, function = %func, "skipping multi-value argument");
                return;
            }
        }

        let first = offset + shape.first_operand();
        let want = offset + shape.min_args();
        if args.len() < want {
            tracing::warn!(
                node = %node.id,
                function = %func,
                got = args.len(),
                want,
                "catalogued comparison has fewer arguments than its shape"
            );
            let diag = rules::build_cmp900(node, &func, shape, args.len(), want);
            self.report_internal(diag);
            return;
        }

        self.comparison(
            node,
            &args[first],
            &args[first + 1],
            shape.is_error(),
            DiagnosticSource::Call,
        );
    }

    /// Identity of the called function, and how many leading arguments
    /// precede the declared parameters (1 for method expressions).
    fn resolve_callee(&self, fun: &Expr) -> Option<(FuncName, usize)> {
        let info = self.pass.info;
        let fun = fun.unparen();
        match &fun.kind {
            ExprKind::Ident { .. } => Some((func_name(info.object_of(fun.id)?)?, 0)),
            ExprKind::Selector { sel, .. } => match info.selection(fun.id) {
                Some(selection) => {
                    let offset = match selection.kind {
                        SelectionKind::MethodVal => 0,
                        SelectionKind::MethodExpr => 1,
                        SelectionKind::FieldVal => return None,
                    };
                    Some((func_name(info.object(selection.object)?)?, offset))
                }
                // Qualified identifier pkg.Name.
                None => Some((func_name(info.object_of(sel.id)?)?, 0)),
            },
            _ => None,
        }
    }

    fn is_tuple(&self, arg: &Expr) -> bool {
        self.pass
            .info
            .type_of(arg.id)
            .and_then(|t| self.pass.types.get(t))
            .is_some_and(|kind| matches!(kind, TypeKind::Tuple { .. }))
    }
}

/// Universe objects and non-functions have no catalog identity.
fn func_name(obj: &Object) -> Option<FuncName> {
    if obj.kind != ObjectKind::Func {
        return None;
    }
    Some(FuncName {
        path: obj.pkg.clone()?,
        receiver: obj.recv.clone(),
        name: obj.name.clone(),
    })
}
