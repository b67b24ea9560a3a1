//! Centralized limits and thresholds.
//!
//! Every bounded traversal in the mapping compiler takes its limit from
//! here so the values can be tuned in one place.

/// Maximum nesting depth for implicit nested-pair expansion.
///
/// The type graph is assumed acyclic apart from self-references, which the
/// recursion guard converts into by-name references; this limit only
/// backstops pathologically deep non-cyclic member chains.
pub const MAX_NESTED_PAIR_DEPTH: u32 = 32;

/// Flattening collapses exactly one level of nested member access
/// (`Address` + `City` -> `AddressCity`). Deeper concatenations are not
/// considered.
pub const FLATTEN_LEVELS: u32 = 1;
