//! Recognizes operands that take the address of a fresh allocation.

use cmplint_ir::info::TypeInfo;
use cmplint_ir::ir::{Expr, ExprKind, TypeId, UnaryOp};

/// An operand of the form `&T{...}` or `new(T)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationSite {
    /// `T`; absent when the type checker recorded nothing for the literal.
    pub element_type: Option<TypeId>,
}

/// Decide whether `expr` denotes the address of a newly allocated variable.
pub fn recognize(expr: &Expr, info: &TypeInfo) -> Option<AllocationSite> {
    match &expr.unparen().kind {
        ExprKind::Unary {
            op: UnaryOp::And,
            x,
        } => {
            let lit = x.unparen();
            if !matches!(lit.kind, ExprKind::CompositeLit { .. }) {
                return None;
            }
            Some(AllocationSite {
                element_type: info.type_of(lit.id),
            })
        }
        ExprKind::Call { fun, args, .. } => {
            let [arg] = args.as_slice() else {
                return None;
            };
            let is_builtin = info
                .type_and_value(fun.id)
                .or_else(|| info.type_and_value(fun.unparen().id))
                .is_some_and(|tv| tv.is_builtin());
            if !is_builtin || fun.unparen().ident_name() != Some("new") {
                return None;
            }
            Some(AllocationSite {
                element_type: info.type_of(arg.id),
            })
        }
        _ => None,
    }
}
