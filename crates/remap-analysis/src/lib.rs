//! Mapping analysis for the remap generator.
//!
//! This crate turns a type graph plus mapping directives into validated,
//! immutable mapping plans:
//! - `property_matcher` - member correspondence for class-like pairs
//! - `enum_matcher` - value correspondence for enum pairs
//! - `conversions` - builtin widening/string conversion classification
//! - `plan_builder` - per-directive plan aggregation, implicit nested plans
//! - `validate` - the diagnostics engine (structural rules, coverage)
//! - `cache` - content-hash-keyed plan memoization across passes
//! - `session` - the per-pass driver (parallel across directives)
//!
//! Analysis is purely functional per directive: identical directive and
//! type-graph inputs always yield identical plans and diagnostics. Nothing
//! here throws past the crate boundary; every detected problem becomes a
//! diagnostic attached to the pass.

pub mod plan;
pub use plan::{
    ContainerKind, EnumPlan, EnumValueMapping, MappingKind, MappingPlan, MatchOrigin, ObjectPlan,
    PairKey, PropertyMapping, UnmatchedMember, UnmatchedReason,
};

pub mod conversions;
pub use conversions::ConversionKind;

pub mod property_matcher;
pub use property_matcher::{MatchOutcome, match_members};

pub mod enum_matcher;
pub use enum_matcher::{EMPTY_STATE_ALIASES, match_values};

pub mod plan_builder;
pub use plan_builder::PlanBuilder;

pub mod validate;
pub use validate::validate_plan;

pub mod cache;
pub use cache::{PlanCache, directive_cache_key};

pub mod session;
pub use session::{AnalysisSession, PassOutput, PlanOutcome};
