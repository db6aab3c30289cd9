//! Suppression of error comparisons that custom `Is`/`Unwrap` methods can make meaningful.

use cmplint_ir::ir::TypeId;
use cmplint_ir::types::{Capability, Shape, TypeMap};

/// `interface{ Is(error) bool }`
pub const ERROR_IS: Capability = Capability {
    method: "Is",
    params: &[Shape::Error],
    results: &[Shape::Bool],
};

/// `interface{ Unwrap() error }`
pub const ERROR_UNWRAP: Capability = Capability {
    method: "Unwrap",
    params: &[],
    results: &[Shape::Error],
};

/// `interface{ Unwrap() []error }`
pub const ERROR_UNWRAP_SLICE: Capability = Capability {
    method: "Unwrap",
    params: &[],
    results: &[Shape::SliceOf(&Shape::Error)],
};

/// Whether an error comparison against a new `*T` should not be reported.
///
/// `errors.Is` consults `Is(error) bool` on the error chain, so a matching
/// method on `*T` may make the comparison true on either side. When the new
/// value is the error being inspected (`is_left`), `errors.Is` also walks
/// what its `Unwrap` method returns.
pub fn should_suppress(types: &TypeMap, t: TypeId, is_left: bool) -> bool {
    if types.implements_on_pointer(t, &ERROR_IS) {
        return true;
    }

    is_left
        && (types.implements_on_pointer(t, &ERROR_UNWRAP)
            || types.implements_on_pointer(t, &ERROR_UNWRAP_SLICE))
}
