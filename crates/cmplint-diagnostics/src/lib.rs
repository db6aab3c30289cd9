//! cmplint diagnostics - diagnostic types, rule catalog, and output.

pub mod diagnostic;
pub mod human;
pub mod rules;

pub use diagnostic::*;
