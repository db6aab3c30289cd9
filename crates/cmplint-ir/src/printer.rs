//! Render expressions back to gofmt-style Go source.
//!
//! Spacing around binary operators follows gofmt: operators bind tighter
//! visually when mixed with lower-precedence operators or when nested
//! inside multi-argument calls (`f(a+b, c)`, `a*b + c`). Function literal
//! bodies are not part of the model and print as `{...}`.

use crate::ir::{BinaryOp, ChanDir, Expr, ExprKind, FieldExpr, NodeId};
use thiserror::Error;

const LOWEST_PREC: u8 = 0;
const UNARY_PREC: u8 = 6;
const HIGHEST_PREC: u8 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("cannot render bad expression {0}")]
    BadExpr(NodeId),
    #[error("literal {0} has no source text")]
    EmptyLiteral(NodeId),
}

/// Render `expr` as Go source text.
pub fn render(expr: &Expr) -> Result<String, RenderError> {
    let mut p = Printer::default();
    p.expr1(expr, LOWEST_PREC, 1)?;
    Ok(p.out)
}

fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::LOr => 1,
        BinaryOp::LAnd => 2,
        BinaryOp::Eql
        | BinaryOp::Neq
        | BinaryOp::Lss
        | BinaryOp::Leq
        | BinaryOp::Gtr
        | BinaryOp::Geq => 3,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
        BinaryOp::Mul
        | BinaryOp::Quo
        | BinaryOp::Rem
        | BinaryOp::Shl
        | BinaryOp::Shr
        | BinaryOp::And
        | BinaryOp::AndNot => 5,
    }
}

fn as_binary(e: &Expr) -> Option<(BinaryOp, &Expr, &Expr)> {
    match &e.kind {
        ExprKind::Binary { op, x, y } => Some((*op, x, y)),
        _ => None,
    }
}

/// Which precedence levels appear in a binary chain, and the highest level
/// at which omitting blanks would produce a different token (`a / *b`).
fn walk_binary(op: BinaryOp, x: &Expr, y: &Expr) -> (bool, bool, u8) {
    let prec = precedence(op);
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    if let Some((lop, lx, ly)) = as_binary(x) {
        if precedence(lop) >= prec {
            let (h4, h5, mp) = walk_binary(lop, lx, ly);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
    }

    match &y.kind {
        ExprKind::Binary {
            op: rop,
            x: rx,
            y: ry,
        } if precedence(*rop) > prec => {
            let (h4, h5, mp) = walk_binary(*rop, rx, ry);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
        ExprKind::Star { .. } if op == BinaryOp::Quo => max_problem = 5,
        ExprKind::Unary { op: uop, .. } => {
            match (op.as_str(), uop.as_str()) {
                ("/", "*") | ("&", "&") | ("&", "^") => max_problem = 5,
                ("+", "+") | ("-", "-") => max_problem = max_problem.max(4),
                _ => {}
            }
        }
        _ => {}
    }
    (has4, has5, max_problem)
}

fn cutoff(op: BinaryOp, x: &Expr, y: &Expr, depth: u32) -> u8 {
    let (has4, has5, max_problem) = walk_binary(op, x, y);
    if max_problem > 0 {
        return max_problem + 1;
    }
    match (has4 && has5, depth == 1) {
        (true, true) => 5,
        (true, false) => 4,
        (false, true) => 6,
        (false, false) => 4,
    }
}

fn diff_prec(e: &Expr, prec: u8) -> u32 {
    match as_binary(e) {
        Some((op, _, _)) if precedence(op) == prec => 0,
        _ => 1,
    }
}

fn reduce_depth(depth: u32) -> u32 {
    depth.saturating_sub(1).max(1)
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn expr0(&mut self, e: &Expr, depth: u32) -> Result<(), RenderError> {
        self.expr1(e, LOWEST_PREC, depth)
    }

    fn expr1(&mut self, e: &Expr, prec1: u8, depth: u32) -> Result<(), RenderError> {
        match &e.kind {
            ExprKind::Bad => return Err(RenderError::BadExpr(e.id)),
            ExprKind::Ident { name } => self.push(name),
            ExprKind::BasicLit { value, .. } => {
                if value.is_empty() {
                    return Err(RenderError::EmptyLiteral(e.id));
                }
                self.push(value);
            }
            ExprKind::Binary { op, x, y } => {
                let depth = depth.max(1);
                if precedence(*op) < prec1 {
                    self.push("(");
                    self.expr1(e, LOWEST_PREC, reduce_depth(depth))?;
                    self.push(")");
                } else {
                    self.binary(*op, x, y, cutoff(*op, x, y, depth), depth)?;
                }
            }
            ExprKind::KeyValue { key, value } => {
                self.expr0(key, depth)?;
                self.push(": ");
                self.expr0(value, depth)?;
            }
            ExprKind::Star { x } => {
                if UNARY_PREC < prec1 {
                    self.push("(");
                    self.expr1(e, LOWEST_PREC, 1)?;
                    self.push(")");
                } else {
                    self.push("*");
                    self.expr1(x, LOWEST_PREC, 1)?;
                }
            }
            ExprKind::Unary { op, x } => {
                if UNARY_PREC < prec1 {
                    self.push("(");
                    self.expr1(e, LOWEST_PREC, 1)?;
                    self.push(")");
                } else {
                    self.push(op.as_str());
                    self.expr1(x, UNARY_PREC, depth)?;
                }
            }
            ExprKind::Paren { x } => {
                if matches!(x.kind, ExprKind::Paren { .. }) {
                    self.expr0(x, depth)?;
                } else {
                    self.push("(");
                    self.expr0(x, reduce_depth(depth))?;
                    self.push(")");
                }
            }
            ExprKind::Selector { x, sel } => {
                self.expr1(x, HIGHEST_PREC, depth)?;
                self.push(".");
                self.expr1(sel, HIGHEST_PREC, depth)?;
            }
            ExprKind::TypeAssert { x, ty } => {
                self.expr1(x, HIGHEST_PREC, depth)?;
                self.push(".(");
                match ty {
                    Some(t) => self.expr0(t, depth)?,
                    None => self.push("type"),
                }
                self.push(")");
            }
            ExprKind::Index { x, indices } => {
                self.expr1(x, HIGHEST_PREC, 1)?;
                self.push("[");
                if let [single] = indices.as_slice() {
                    self.expr0(single, depth + 1)?;
                } else {
                    self.list(indices, depth + 1)?;
                }
                self.push("]");
            }
            ExprKind::Slice {
                x,
                low,
                high,
                max,
                slice3,
            } => {
                self.expr1(x, HIGHEST_PREC, 1)?;
                self.push("[");
                let mut parts: Vec<Option<&Expr>> = vec![low.as_deref(), high.as_deref()];
                if *slice3 || max.is_some() {
                    parts.push(max.as_deref());
                }
                let needs_blanks = depth <= 1
                    && parts.iter().flatten().count() > 1
                    && parts.iter().flatten().any(|p| as_binary(p).is_some());
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        if parts[i - 1].is_some() && needs_blanks {
                            self.push(" ");
                        }
                        self.push(":");
                        if part.is_some() && needs_blanks {
                            self.push(" ");
                        }
                    }
                    if let Some(p) = part {
                        self.expr0(p, depth + 1)?;
                    }
                }
                self.push("]");
            }
            ExprKind::Call {
                fun,
                args,
                ellipsis,
            } => {
                let depth = if args.len() > 1 { depth + 1 } else { depth };
                self.expr1(fun, HIGHEST_PREC, depth)?;
                self.push("(");
                self.list(args, depth)?;
                if *ellipsis {
                    self.push("...");
                }
                self.push(")");
            }
            ExprKind::CompositeLit { ty, elts } => {
                if let Some(t) = ty {
                    self.expr1(t, HIGHEST_PREC, depth)?;
                }
                self.push("{");
                self.list(elts, 1)?;
                self.push("}");
            }
            ExprKind::FuncLit { ty, .. } => {
                self.expr0(ty, depth)?;
                self.push(" {...}");
            }
            ExprKind::ArrayType { len, elem } => {
                self.push("[");
                if let Some(l) = len {
                    self.expr0(l, depth)?;
                }
                self.push("]");
                self.expr0(elem, depth)?;
            }
            ExprKind::MapType { key, value } => {
                self.push("map[");
                self.expr0(key, depth)?;
                self.push("]");
                self.expr0(value, depth)?;
            }
            ExprKind::ChanType { dir, value } => {
                self.push(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.expr0(value, depth)?;
            }
            ExprKind::FuncType { params, results } => {
                self.push("func");
                self.signature(params, results, depth)?;
            }
            ExprKind::StructType { fields } => {
                self.push("struct{");
                self.members(fields, depth, false)?;
                self.push("}");
            }
            ExprKind::InterfaceType { methods } => {
                self.push("interface{");
                self.members(methods, depth, true)?;
                self.push("}");
            }
            ExprKind::Ellipsis { elt } => {
                self.push("...");
                if let Some(t) = elt {
                    self.expr0(t, depth)?;
                }
            }
        }
        Ok(())
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        x: &Expr,
        y: &Expr,
        cutoff: u8,
        depth: u32,
    ) -> Result<(), RenderError> {
        let prec = precedence(op);
        let blank = prec < cutoff;
        self.expr1(x, prec, depth + diff_prec(x, prec))?;
        if blank {
            self.push(" ");
        }
        self.push(op.as_str());
        if blank {
            self.push(" ");
        }
        self.expr1(y, prec + 1, depth + 1)
    }

    fn list(&mut self, items: &[Expr], depth: u32) -> Result<(), RenderError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr0(item, depth)?;
        }
        Ok(())
    }

    fn fields(&mut self, fields: &[FieldExpr], depth: u32) -> Result<(), RenderError> {
        for (i, f) in fields.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if !f.names.is_empty() {
                self.push(&f.names.join(", "));
                self.push(" ");
            }
            self.expr0(&f.ty, depth)?;
        }
        Ok(())
    }

    fn signature(
        &mut self,
        params: &[FieldExpr],
        results: &[FieldExpr],
        depth: u32,
    ) -> Result<(), RenderError> {
        self.push("(");
        self.fields(params, depth)?;
        self.push(")");
        match results {
            [] => {}
            [single] if single.names.is_empty() => {
                self.push(" ");
                self.expr0(&single.ty, depth)?;
            }
            _ => {
                self.push(" (");
                self.fields(results, depth)?;
                self.push(")");
            }
        }
        Ok(())
    }

    fn members(
        &mut self,
        members: &[FieldExpr],
        depth: u32,
        methods: bool,
    ) -> Result<(), RenderError> {
        if members.is_empty() {
            return Ok(());
        }
        self.push(" ");
        for (i, m) in members.iter().enumerate() {
            if i > 0 {
                self.push("; ");
            }
            match (&m.ty.kind, m.names.first()) {
                (ExprKind::FuncType { params, results }, Some(name)) if methods => {
                    self.push(name);
                    self.signature(params, results, depth)?;
                }
                _ => {
                    if !m.names.is_empty() {
                        self.push(&m.names.join(", "));
                        self.push(" ");
                    }
                    self.expr0(&m.ty, depth)?;
                }
            }
        }
        self.push(" ");
        Ok(())
    }
}
