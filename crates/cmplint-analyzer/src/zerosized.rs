//! Zero-size classification of types.

use cmplint_ir::ir::{TypeId, TypeKind};
use cmplint_ir::types::TypeMap;

/// Nesting bound; well-formed Go types never come close.
const MAX_DEPTH: usize = 64;

/// Whether every value of type `t` provably occupies no storage:
/// zero-length arrays, arrays of zero-sized elements, and structs whose
/// fields are all zero-sized.
pub fn is_zero_sized(types: &TypeMap, t: TypeId) -> bool {
    zero_sized_at(types, t, 0)
}

fn zero_sized_at(types: &TypeMap, t: TypeId, depth: usize) -> bool {
    if depth > MAX_DEPTH {
        return false;
    }
    match types.underlying(t) {
        Some(TypeKind::Array { len, elem }) => *len == 0 || zero_sized_at(types, *elem, depth + 1),
        Some(TypeKind::Struct { fields }) => fields
            .iter()
            .all(|f| zero_sized_at(types, f.ty, depth + 1)),
        _ => false,
    }
}
