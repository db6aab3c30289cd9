//! Type system helpers for working with Go types from frontend data.

use crate::ir::{ChanDir, Method, Package, TypeDef, TypeId, TypeKind};
use std::collections::{HashMap, HashSet};

/// Bound on `Named` → underlying hops; the frontend never emits longer chains.
const MAX_UNDERLYING_HOPS: usize = 16;

/// Structural shape of a parameter or result in a [`Capability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The predeclared `error` interface.
    Error,
    /// The predeclared `bool` type.
    Bool,
    /// `[]T` where `T` has the given shape.
    SliceOf(&'static Shape),
}

/// A synthesized single-method interface such as `interface{ Is(error) bool }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub method: &'static str,
    pub params: &'static [Shape],
    pub results: &'static [Shape],
}

/// Type lookup table for a package
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    types: HashMap<TypeId, TypeKind>,
}

impl TypeMap {
    pub fn from_package(pkg: &Package) -> Self {
        Self::new(&pkg.types)
    }

    pub fn new(defs: &[TypeDef]) -> Self {
        let types = defs.iter().map(|t| (t.id, t.kind.clone())).collect();
        Self { types }
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeKind> {
        self.types.get(&id)
    }

    /// Follow `Named` types to their underlying representation.
    pub fn underlying(&self, id: TypeId) -> Option<&TypeKind> {
        let mut current = id;
        for _ in 0..MAX_UNDERLYING_HOPS {
            match self.types.get(&current)? {
                TypeKind::Named { underlying, .. } => current = *underlying,
                other => return Some(other),
            }
        }
        None
    }

    /// The predeclared `error` type.
    pub fn is_error_type(&self, id: TypeId) -> bool {
        matches!(
            self.types.get(&id),
            Some(TypeKind::Named { name, pkg: None, .. }) if name == "error"
        )
    }

    pub fn is_bool_type(&self, id: TypeId) -> bool {
        matches!(self.types.get(&id), Some(TypeKind::Basic { name }) if name == "bool")
    }

    fn matches_shape(&self, id: TypeId, shape: &Shape) -> bool {
        match shape {
            Shape::Error => self.is_error_type(id),
            Shape::Bool => self.is_bool_type(id),
            Shape::SliceOf(elem_shape) => match self.types.get(&id) {
                Some(TypeKind::Slice { elem }) => self.matches_shape(*elem, elem_shape),
                _ => false,
            },
        }
    }

    /// Reports whether `*T` has a method satisfying `cap`, i.e. whether
    /// `types.Implements(types.NewPointer(t), cap)` holds on the Go side.
    pub fn implements_on_pointer(&self, t: TypeId, cap: &Capability) -> bool {
        let Some(method) = self.lookup_pointer_method(t, cap.method) else {
            return false;
        };
        let Some(TypeKind::Signature {
            params,
            results,
            variadic,
        }) = self.types.get(&method.sig)
        else {
            return false;
        };

        !*variadic
            && params.len() == cap.params.len()
            && results.len() == cap.results.len()
            && params
                .iter()
                .zip(cap.params)
                .all(|(p, s)| self.matches_shape(*p, s))
            && results
                .iter()
                .zip(cap.results)
                .all(|(r, s)| self.matches_shape(*r, s))
    }

    /// Find method `name` in the method set of `*T`, including methods promoted
    /// through embedded fields. The shallowest embedding depth wins; a name
    /// that is ambiguous at that depth, or that denotes a field, yields `None`.
    pub fn lookup_pointer_method(&self, t: TypeId, name: &str) -> Option<&Method> {
        // *T has no methods when T is a pointer or an interface.
        match self.underlying(t)? {
            TypeKind::Pointer { .. } | TypeKind::Interface { .. } => return None,
            _ => {}
        }

        let mut level = vec![(t, false)];
        let mut seen: HashSet<TypeId> = HashSet::new();

        while !level.is_empty() {
            let mut hits = 0usize;
            let mut found: Option<&Method> = None;
            let mut next = Vec::new();

            for (ty, multiples) in self.consolidate(level) {
                if let Some(TypeKind::Named { methods, .. }) = self.types.get(&ty) {
                    if !seen.insert(ty) {
                        continue;
                    }
                    if let Some(m) = methods.iter().find(|m| m.name == name) {
                        hits += hit_weight(multiples);
                        found = Some(m);
                    }
                }
                match self.underlying(ty) {
                    Some(TypeKind::Struct { fields }) => {
                        for f in fields {
                            if f.name == name {
                                hits += hit_weight(multiples);
                                found = None;
                            }
                            if f.embedded {
                                next.push((f.ty, multiples));
                            }
                        }
                    }
                    // Embedded interfaces promote their methods.
                    Some(TypeKind::Interface { methods }) if ty != t => {
                        if let Some(m) = methods.iter().find(|m| m.name == name) {
                            hits += hit_weight(multiples);
                            found = Some(m);
                        }
                    }
                    _ => {}
                }
            }

            match hits {
                0 => level = next,
                1 => return found,
                _ => return None,
            }
        }
        None
    }

    /// Dereference and merge the embedded types of one depth, flagging types
    /// that occur more than once.
    fn consolidate(&self, level: Vec<(TypeId, bool)>) -> Vec<(TypeId, bool)> {
        let mut merged: Vec<(TypeId, bool)> = Vec::with_capacity(level.len());
        for (ty, multiples) in level {
            let ty = self.deref(ty);
            match merged.iter_mut().find(|(seen, _)| *seen == ty) {
                Some(entry) => entry.1 = true,
                None => merged.push((ty, multiples)),
            }
        }
        merged
    }

    fn deref(&self, id: TypeId) -> TypeId {
        match self.types.get(&id) {
            Some(TypeKind::Pointer { elem }) => *elem,
            _ => id,
        }
    }

    /// Structural type identity. Defined types are identical only to themselves.
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let (Some(ta), Some(tb)) = (self.types.get(&a), self.types.get(&b)) else {
            return false;
        };
        match (ta, tb) {
            (TypeKind::Basic { name: na }, TypeKind::Basic { name: nb }) => na == nb,
            (
                TypeKind::Named {
                    name: na,
                    pkg: pa,
                    type_args: aa,
                    ..
                },
                TypeKind::Named {
                    name: nb,
                    pkg: pb,
                    type_args: ab,
                    ..
                },
            ) => na == nb && pa == pb && self.all_identical(aa, ab),
            (TypeKind::Pointer { elem: ea }, TypeKind::Pointer { elem: eb })
            | (TypeKind::Slice { elem: ea }, TypeKind::Slice { elem: eb }) => {
                self.identical(*ea, *eb)
            }
            (
                TypeKind::Array {
                    len: la,
                    elem: ea,
                },
                TypeKind::Array {
                    len: lb,
                    elem: eb,
                },
            ) => la == lb && self.identical(*ea, *eb),
            (
                TypeKind::Map {
                    key: ka,
                    elem: ea,
                },
                TypeKind::Map {
                    key: kb,
                    elem: eb,
                },
            ) => self.identical(*ka, *kb) && self.identical(*ea, *eb),
            (TypeKind::Chan { dir: da, elem: ea }, TypeKind::Chan { dir: db, elem: eb }) => {
                da == db && self.identical(*ea, *eb)
            }
            (TypeKind::Struct { fields: fa }, TypeKind::Struct { fields: fb }) => {
                fa.len() == fb.len()
                    && fa.iter().zip(fb).all(|(x, y)| {
                        x.name == y.name && x.embedded == y.embedded && self.identical(x.ty, y.ty)
                    })
            }
            (
                TypeKind::Signature {
                    params: pa,
                    results: ra,
                    variadic: va,
                },
                TypeKind::Signature {
                    params: pb,
                    results: rb,
                    variadic: vb,
                },
            ) => va == vb && self.all_identical(pa, pb) && self.all_identical(ra, rb),
            (TypeKind::Interface { methods: ma }, TypeKind::Interface { methods: mb }) => {
                if ma.len() != mb.len() {
                    return false;
                }
                let mut ma: Vec<&Method> = ma.iter().collect();
                let mut mb: Vec<&Method> = mb.iter().collect();
                ma.sort_by(|x, y| x.name.cmp(&y.name));
                mb.sort_by(|x, y| x.name.cmp(&y.name));
                ma.iter()
                    .zip(&mb)
                    .all(|(x, y)| x.name == y.name && self.identical(x.sig, y.sig))
            }
            (TypeKind::Tuple { elems: ea }, TypeKind::Tuple { elems: eb }) => {
                self.all_identical(ea, eb)
            }
            (TypeKind::TypeParam { name: na }, TypeKind::TypeParam { name: nb }) => na == nb,
            _ => false,
        }
    }

    fn all_identical(&self, a: &[TypeId], b: &[TypeId]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.identical(*x, *y))
    }

    /// Render a type the way `types.TypeString(t, types.RelativeTo(pkg))` does:
    /// types declared in `relative_to` are unqualified, others carry their
    /// full import path.
    pub fn type_string(&self, id: TypeId, relative_to: &str) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, relative_to);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, rel: &str) {
        let Some(kind) = self.types.get(&id) else {
            out.push_str("invalid type");
            return;
        };
        match kind {
            TypeKind::Basic { name } | TypeKind::TypeParam { name } => out.push_str(name),
            TypeKind::Named {
                name,
                pkg,
                type_args,
                ..
            } => {
                if let Some(path) = pkg.as_deref().filter(|p| *p != rel) {
                    out.push_str(path);
                    out.push('.');
                }
                out.push_str(name);
                if !type_args.is_empty() {
                    out.push('[');
                    self.write_list(out, type_args, rel);
                    out.push(']');
                }
            }
            TypeKind::Pointer { elem } => {
                out.push('*');
                self.write_type(out, *elem, rel);
            }
            TypeKind::Slice { elem } => {
                out.push_str("[]");
                self.write_type(out, *elem, rel);
            }
            TypeKind::Array { len, elem } => {
                out.push_str(&format!("[{len}]"));
                self.write_type(out, *elem, rel);
            }
            TypeKind::Map { key, elem } => {
                out.push_str("map[");
                self.write_type(out, *key, rel);
                out.push(']');
                self.write_type(out, *elem, rel);
            }
            TypeKind::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(out, *elem, rel);
            }
            TypeKind::Struct { fields } => {
                out.push_str("struct{");
                for (i, f) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !f.embedded {
                        out.push_str(&f.name);
                        out.push(' ');
                    }
                    self.write_type(out, f.ty, rel);
                }
                out.push('}');
            }
            TypeKind::Interface { methods } => {
                out.push_str("interface{");
                for (i, m) in methods.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(&m.name);
                    self.write_signature(out, m.sig, rel);
                }
                out.push('}');
            }
            TypeKind::Signature { .. } => {
                out.push_str("func");
                self.write_signature(out, id, rel);
            }
            TypeKind::Tuple { elems } => {
                out.push('(');
                self.write_list(out, elems, rel);
                out.push(')');
            }
            TypeKind::Unknown => out.push_str("invalid type"),
        }
    }

    fn write_signature(&self, out: &mut String, sig: TypeId, rel: &str) {
        let Some(TypeKind::Signature {
            params,
            results,
            variadic,
        }) = self.types.get(&sig)
        else {
            out.push_str("(invalid type)");
            return;
        };

        out.push('(');
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let last = i + 1 == params.len();
            match self.types.get(p) {
                Some(TypeKind::Slice { elem }) if *variadic && last => {
                    out.push_str("...");
                    self.write_type(out, *elem, rel);
                }
                _ => self.write_type(out, *p, rel),
            }
        }
        out.push(')');

        match results.as_slice() {
            [] => {}
            [single] => {
                out.push(' ');
                self.write_type(out, *single, rel);
            }
            many => {
                out.push_str(" (");
                self.write_list(out, many, rel);
                out.push(')');
            }
        }
    }

    fn write_list(&self, out: &mut String, ids: &[TypeId], rel: &str) {
        for (i, t) in ids.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, *t, rel);
        }
    }
}

/// A hit through a type embedded more than once at one depth is a collision.
fn hit_weight(multiples: bool) -> usize {
    if multiples {
        2
    } else {
        1
    }
}
