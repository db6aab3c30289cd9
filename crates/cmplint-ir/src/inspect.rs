//! Pre-order node enumeration, filtered by node kind.

use crate::ir::{Expr, ExprKind, SourceFile};

/// Node kinds a pass can ask the index for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Binary,
    Call,
}

impl NodeKind {
    pub fn matches(&self, expr: &Expr) -> bool {
        matches!(
            (self, &expr.kind),
            (NodeKind::Binary, ExprKind::Binary { .. }) | (NodeKind::Call, ExprKind::Call { .. })
        )
    }
}

/// Source of syntax nodes for an analysis pass.
///
/// Implementations must yield nodes in document order, parents before
/// children, each node exactly once.
pub trait NodeIndex {
    fn preorder<'s>(&'s self, kinds: &'s [NodeKind]) -> Box<dyn Iterator<Item = &'s Expr> + 's>;
}

/// Node index over the files of one package.
#[derive(Debug, Clone, Copy)]
pub struct Inspector<'a> {
    files: &'a [SourceFile],
}

impl<'a> Inspector<'a> {
    pub fn new(files: &'a [SourceFile]) -> Self {
        Self { files }
    }
}

impl NodeIndex for Inspector<'_> {
    fn preorder<'s>(&'s self, kinds: &'s [NodeKind]) -> Box<dyn Iterator<Item = &'s Expr> + 's> {
        let roots = self.files.iter().flat_map(|f| f.exprs.iter());
        let walk = roots.flat_map(Preorder::new);
        if kinds.is_empty() {
            Box::new(walk)
        } else {
            Box::new(walk.filter(move |e| kinds.iter().any(|k| k.matches(e))))
        }
    }
}

struct Preorder<'a> {
    stack: Vec<&'a Expr>,
}

impl<'a> Preorder<'a> {
    fn new(root: &'a Expr) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
