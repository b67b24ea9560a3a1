//! Value correspondence for enum pairs.
//!
//! For each source value, in declaration order:
//! 1. exact case-sensitive name match
//! 2. case-insensitive match
//! 3. empty-state alias lookup: if the value's name is in the closed set
//!    `{None, Unknown, Default}`, every other member of the set is tried
//!    against the target's values (case-insensitive), first hit wins
//! 4. otherwise unmatched, recorded and never silently dropped
//!
//! The alias step exists because enums crossing architectural layers
//! conventionally use different "absence" sentinels. The set is closed and
//! hard-coded: an open set would invite cross-mappings between unrelated
//! values.

use crate::plan::{EnumValueMapping, MatchOrigin};
use remap_graph::TypeDescriptor;

/// The closed equivalence set of conventional empty-state value names.
pub const EMPTY_STATE_ALIASES: &[&str] = &["None", "Unknown", "Default"];

/// Compute the value table for one enum pair, in source declaration order.
pub fn match_values(source: &TypeDescriptor, target: &TypeDescriptor) -> Vec<EnumValueMapping> {
    source
        .values
        .iter()
        .map(|source_value| match_one(source_value, &target.values))
        .collect()
}

fn match_one(source_value: &str, target_values: &[String]) -> EnumValueMapping {
    if let Some(exact) = target_values.iter().find(|v| *v == source_value) {
        return mapping(source_value, Some(exact), MatchOrigin::Exact);
    }

    if let Some(relaxed) = target_values
        .iter()
        .find(|v| v.eq_ignore_ascii_case(source_value))
    {
        return mapping(source_value, Some(relaxed), MatchOrigin::CaseInsensitive);
    }

    if EMPTY_STATE_ALIASES.contains(&source_value) {
        for alias in EMPTY_STATE_ALIASES.iter().filter(|a| **a != source_value) {
            if let Some(hit) = target_values.iter().find(|v| v.eq_ignore_ascii_case(alias)) {
                return mapping(source_value, Some(hit), MatchOrigin::EmptyAlias);
            }
        }
    }

    mapping(source_value, None, MatchOrigin::Unmatched)
}

fn mapping(source: &str, target: Option<&String>, origin: MatchOrigin) -> EnumValueMapping {
    EnumValueMapping {
        source_value: source.to_string(),
        target_value: target.cloned(),
        origin,
    }
}
