//! Indexed type-checker results for a package.

use crate::ir::{Mode, NodeId, Object, ObjectId, Package, SelectionKind, TypeId};
use std::collections::HashMap;

/// Type and mode recorded for an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeAndValue {
    pub ty: Option<TypeId>,
    pub mode: Mode,
}

impl TypeAndValue {
    /// The expression is the untyped `nil` value.
    pub fn is_nil(&self) -> bool {
        self.mode == Mode::Nil
    }

    pub fn is_builtin(&self) -> bool {
        self.mode == Mode::Builtin
    }
}

/// A resolved selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: SelectionKind,
    pub object: ObjectId,
}

/// Lookup tables over [`crate::ir::TypeInfoData`], keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    types: HashMap<NodeId, TypeAndValue>,
    uses: HashMap<NodeId, ObjectId>,
    selections: HashMap<NodeId, Selection>,
    objects: HashMap<ObjectId, Object>,
}

impl TypeInfo {
    pub fn from_package(pkg: &Package) -> Self {
        let types = pkg
            .info
            .types
            .iter()
            .map(|t| {
                (
                    t.node,
                    TypeAndValue {
                        ty: t.ty,
                        mode: t.mode,
                    },
                )
            })
            .collect();
        let uses = pkg.info.uses.iter().map(|u| (u.node, u.object)).collect();
        let selections = pkg
            .info
            .selections
            .iter()
            .map(|s| {
                (
                    s.node,
                    Selection {
                        kind: s.kind,
                        object: s.object,
                    },
                )
            })
            .collect();
        let objects = pkg.objects.iter().map(|o| (o.id, o.clone())).collect();

        Self {
            types,
            uses,
            selections,
            objects,
        }
    }

    pub fn type_and_value(&self, node: NodeId) -> Option<&TypeAndValue> {
        self.types.get(&node)
    }

    /// Type of an expression, if the checker recorded one.
    pub fn type_of(&self, node: NodeId) -> Option<TypeId> {
        self.types.get(&node).and_then(|tv| tv.ty)
    }

    /// Declaration an identifier refers to.
    pub fn object_of(&self, node: NodeId) -> Option<&Object> {
        self.uses.get(&node).and_then(|id| self.objects.get(id))
    }

    pub fn selection(&self, node: NodeId) -> Option<&Selection> {
        self.selections.get(&node)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }
}
