//! Mapping plans: the finalized, validated description of one generated
//! transformation, independent of its textual rendering.
//!
//! Plans are immutable once built. A pass discards and rebuilds them from
//! the current type graph; there is no incremental mutation. Recomputation
//! is the correctness strategy, cached by content hash of the inputs.

use crate::conversions::ConversionKind;
use remap_graph::{MappingDirective, TypeId};
use serde::Serialize;
use smallvec::SmallVec;

/// A (source type, target type) pair, the unit of plan identity.
pub type PairKey = (TypeId, TypeId);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    List,
    Set,
}

/// How a bound member's value converts from source to target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MappingKind {
    /// Identical types on both sides; `needs_clone` when a by-value copy
    /// is not cheap.
    Direct { needs_clone: bool },
    /// A builtin widening/string conversion.
    Convert(ConversionKind),
    /// Recursive object mapping through the routine for this pair.
    Nested { source: TypeId, target: TypeId },
    /// Enum value mapping through the routine for this pair.
    EnumValue { source: TypeId, target: TypeId },
    /// Element-wise mapping preserving the target's container kind.
    Collection {
        container: ContainerKind,
        element: Box<MappingKind>,
    },
}

impl MappingKind {
    pub fn requires_conversion(&self) -> bool {
        matches!(self, MappingKind::Convert(_))
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, MappingKind::Nested { .. })
    }

    pub fn has_enum_mapping(&self) -> bool {
        match self {
            MappingKind::EnumValue { .. } => true,
            MappingKind::Collection { element, .. } => element.has_enum_mapping(),
            _ => false,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, MappingKind::Collection { .. })
    }

    /// Collect every (source, target) pair this kind maps through, including
    /// collection elements. These pairs need their own plans.
    pub fn collect_pairs(&self, out: &mut Vec<PairKey>) {
        match self {
            MappingKind::Nested { source, target } | MappingKind::EnumValue { source, target } => {
                out.push((*source, *target));
            }
            MappingKind::Collection { element, .. } => element.collect_pairs(out),
            _ => {}
        }
    }
}

/// One resolved correspondence between a source member (or flattened member
/// chain) and a target member.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyMapping {
    /// Index of the bound member in the target type's member list.
    pub target_member: usize,
    /// Member indices walked on the source side. Length one for a plain
    /// binding; longer when flattened (outer member first).
    pub source_path: SmallVec<[usize; 2]>,
    pub kind: MappingKind,
    /// Bound by an explicit rename directive (highest precedence,
    /// unambiguous by definition).
    pub via_directive: bool,
    /// Source is non-nullable, target is nullable: wrap in `Some`.
    pub wrap_some: bool,
    /// Both sides nullable: map through the option.
    pub through_option: bool,
}

impl PropertyMapping {
    pub fn is_flattened(&self) -> bool {
        self.source_path.len() > 1
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum UnmatchedReason {
    /// No source member matched by directive, name, or flattening.
    NoCandidate,
    /// A source member matched by name but its type cannot convert.
    NotConvertible { source_member: usize },
}

/// A target member with no resolved mapping, and why.
#[derive(Clone, Debug, Serialize)]
pub struct UnmatchedMember {
    pub target_member: usize,
    pub reason: UnmatchedReason,
}

/// One (source value, target value or absent) enum correspondence.
/// Ordering always follows source declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumValueMapping {
    pub source_value: String,
    pub target_value: Option<String>,
    pub origin: MatchOrigin,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MatchOrigin {
    Exact,
    CaseInsensitive,
    /// Matched through the closed empty-state alias set.
    EmptyAlias,
    Unmatched,
}

impl EnumValueMapping {
    pub fn is_matched(&self) -> bool {
        self.target_value.is_some()
    }
}

/// Validated aggregate for one class-like mapping.
#[derive(Clone, Debug, Serialize)]
pub struct ObjectPlan {
    pub source: TypeId,
    pub target: TypeId,
    pub directive: MappingDirective,
    /// Declared by a directive, as opposed to discovered through a nested
    /// member.
    pub explicit: bool,
    pub mappings: Vec<PropertyMapping>,
    pub unmatched: Vec<UnmatchedMember>,
    /// Target member indices bound by more than one source (fan-in).
    pub fan_in: Vec<usize>,
    /// Inverted mappings for the reverse routine. Empty unless the
    /// directive is bidirectional. `target_member` indexes into the
    /// original source type's members.
    pub reverse_mappings: Vec<PropertyMapping>,
    pub reverse_unmatched: Vec<UnmatchedMember>,
    /// Ordered derived-type dispatch table, declaration order.
    pub dispatch: Vec<PairKey>,
}

/// Validated aggregate for one enum mapping.
#[derive(Clone, Debug, Serialize)]
pub struct EnumPlan {
    pub source: TypeId,
    pub target: TypeId,
    pub directive: MappingDirective,
    pub explicit: bool,
    pub values: Vec<EnumValueMapping>,
    /// Value table for the reverse routine, present iff bidirectional.
    pub reverse_values: Vec<EnumValueMapping>,
}

#[derive(Clone, Debug, Serialize)]
pub enum MappingPlan {
    Object(ObjectPlan),
    Enum(EnumPlan),
}

impl MappingPlan {
    pub fn source(&self) -> TypeId {
        match self {
            MappingPlan::Object(p) => p.source,
            MappingPlan::Enum(p) => p.source,
        }
    }

    pub fn target(&self) -> TypeId {
        match self {
            MappingPlan::Object(p) => p.target,
            MappingPlan::Enum(p) => p.target,
        }
    }

    pub fn pair(&self) -> PairKey {
        (self.source(), self.target())
    }

    pub fn is_explicit(&self) -> bool {
        match self {
            MappingPlan::Object(p) => p.explicit,
            MappingPlan::Enum(p) => p.explicit,
        }
    }

    pub fn directive(&self) -> &MappingDirective {
        match self {
            MappingPlan::Object(p) => &p.directive,
            MappingPlan::Enum(p) => &p.directive,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectPlan> {
        match self {
            MappingPlan::Object(p) => Some(p),
            MappingPlan::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumPlan> {
        match self {
            MappingPlan::Enum(p) => Some(p),
            MappingPlan::Object(_) => None,
        }
    }
}
