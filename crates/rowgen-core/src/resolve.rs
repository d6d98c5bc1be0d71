//! Column-to-type resolution.
//!
//! The assembly pipeline is engine-agnostic; everything it knows about target
//! types comes through [`TypeResolver`]. Engine crates implement the trait
//! for their native type systems.

use crate::catalog::Column;

/// Placeholder type for columns no resolver rule covers.
///
/// The placeholder participates in type unification: when two same-named
/// fields land in one record and only one of them resolved, the other takes
/// over its concrete type.
pub const UNKNOWN_TYPE: &str = "serde_json::Value";

/// Maps catalog columns to target type names.
pub trait TypeResolver {
    /// Resolves `column` to a target type name.
    ///
    /// Implementations are total: a column with no matching rule resolves to
    /// [`UNKNOWN_TYPE`] instead of failing. Nullability is part of the
    /// resolved type, so two columns differing only in `not_null` resolve to
    /// different names.
    fn resolve(&self, column: &Column) -> String;
}

impl<T: TypeResolver + ?Sized> TypeResolver for &T {
    fn resolve(&self, column: &Column) -> String {
        (**self).resolve(column)
    }
}
