//! Builtin conversion classification.
//!
//! When two bound members have different types and neither nested-object
//! nor enum mapping applies, a small closed set of builtin conversions can
//! still bridge them: numeric widening and the to-string family. Anything
//! outside this set is unconvertible and surfaces as a diagnostic, never
//! as silently dropped data.

use remap_graph::TypeRef;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ConversionKind {
    /// `i32` widening into `i64`.
    WidenToI64,
    /// Any numeric kind rendered as a string.
    NumberToString,
    BoolToString,
    /// Identifier-to-string: `uuid` rendered in canonical form.
    UuidToString,
    /// Timestamp rendered as an ISO-8601 string.
    TimestampToString,
}

/// The builtin conversion from `source` to `target`, if one exists.
pub fn builtin_conversion(source: &TypeRef, target: &TypeRef) -> Option<ConversionKind> {
    match (source, target) {
        (TypeRef::I32, TypeRef::I64) => Some(ConversionKind::WidenToI64),
        (TypeRef::I32 | TypeRef::I64 | TypeRef::F64, TypeRef::String) => {
            Some(ConversionKind::NumberToString)
        }
        (TypeRef::Bool, TypeRef::String) => Some(ConversionKind::BoolToString),
        (TypeRef::Uuid, TypeRef::String) => Some(ConversionKind::UuidToString),
        (TypeRef::Timestamp, TypeRef::String) => Some(ConversionKind::TimestampToString),
        _ => None,
    }
}
