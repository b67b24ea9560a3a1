//! Member correspondence for class-like pairs.
//!
//! For a (source type, target type, naming strategy) triple this module
//! computes the ordered list of property mappings plus the target members
//! that stayed unmatched. Target members are processed in declaration
//! order; per member the precedence is:
//!
//! 1. skip if the target member is ignored
//! 2. explicit rename directive on a source member (overrides all
//!    heuristics, always unambiguous)
//! 3. strategy-transformed name match, case-insensitive on the
//!    transformed name
//! 4. with flattening enabled, `{nested member}{inner member}`
//!    concatenations one level deep, first hit wins, ties broken by
//!    source declaration order
//! 5. otherwise unmatched, recorded as such

use crate::conversions::builtin_conversion;
use crate::plan::{
    ContainerKind, MappingKind, PropertyMapping, UnmatchedMember, UnmatchedReason,
};
use remap_common::NamingStrategy;
use remap_graph::{MemberDescriptor, TypeGraph, TypeId, TypeRef, Visibility};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

/// Output of one matching run.
#[derive(Clone, Debug, Default)]
pub struct MatchOutcome {
    pub mappings: Vec<PropertyMapping>,
    pub unmatched: Vec<UnmatchedMember>,
    /// Target member indices bound by more than one rename directive.
    pub fan_in: Vec<usize>,
}

/// Compute member correspondences for one class-like pair.
pub fn match_members(
    graph: &TypeGraph,
    source: TypeId,
    target: TypeId,
    strategy: NamingStrategy,
    flatten_enabled: bool,
    include_private: bool,
) -> MatchOutcome {
    let source_ty = graph.get(source);
    let target_ty = graph.get(target);
    let mut outcome = MatchOutcome::default();

    let candidates: Vec<(usize, &MemberDescriptor)> = source_ty
        .members
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.ignore)
        .filter(|(_, m)| include_private || m.visibility == Visibility::Public)
        .collect();

    for (target_idx, target_member) in target_ty.members.iter().enumerate() {
        if target_member.ignore {
            continue;
        }

        // Explicit rename directives take precedence over every heuristic.
        let renamed: Vec<usize> = candidates
            .iter()
            .filter(|(_, m)| m.rename.as_deref() == Some(target_member.name.as_str()))
            .map(|(i, _)| *i)
            .collect();
        if let Some(&source_idx) = renamed.first() {
            if renamed.len() > 1 {
                outcome.fan_in.push(target_idx);
            }
            let source_member = &source_ty.members[source_idx];
            bind(
                graph,
                &mut outcome,
                PathInfo {
                    ty: source_member.ty.clone(),
                    nullable: source_member.nullable,
                },
                smallvec![source_idx],
                target_idx,
                target_member,
                true,
            );
            continue;
        }

        // Direct name match under the naming strategy.
        if let Some(&(source_idx, source_member)) = candidates
            .iter()
            .find(|(_, m)| strategy.matches(&m.name, &target_member.name))
        {
            bind(
                graph,
                &mut outcome,
                PathInfo {
                    ty: source_member.ty.clone(),
                    nullable: source_member.nullable,
                },
                smallvec![source_idx],
                target_idx,
                target_member,
                false,
            );
            continue;
        }

        // One level of flattening: `Address` + `City` matches `AddressCity`.
        if flatten_enabled
            && let Some((path, info)) =
                flatten_candidate(graph, &candidates, strategy, target_member, include_private)
        {
            bind(graph, &mut outcome, info, path, target_idx, target_member, false);
            continue;
        }

        trace!(
            target = %target_ty.qualified_name(),
            member = %target_member.name,
            "target member unmatched"
        );
        outcome.unmatched.push(UnmatchedMember {
            target_member: target_idx,
            reason: UnmatchedReason::NoCandidate,
        });
    }

    outcome
}

/// Type and nullability of the source expression a binding reads from.
struct PathInfo {
    ty: TypeRef,
    nullable: bool,
}

/// Search nested source members for a `{outer}{inner}` concatenation that
/// matches the target member's name. First matching concatenation wins;
/// the candidate list is already in source declaration order.
fn flatten_candidate(
    graph: &TypeGraph,
    candidates: &[(usize, &MemberDescriptor)],
    strategy: NamingStrategy,
    target_member: &MemberDescriptor,
    include_private: bool,
) -> Option<(SmallVec<[usize; 2]>, PathInfo)> {
    for &(outer_idx, outer) in candidates {
        let Some(nested_id) = graph.resolve(&outer.ty) else {
            continue;
        };
        let nested = graph.get(nested_id);
        if !nested.is_class_like() {
            continue;
        }
        for (inner_idx, inner) in nested.members.iter().enumerate() {
            if inner.ignore {
                continue;
            }
            if !include_private && inner.visibility == Visibility::Private {
                continue;
            }
            let concatenated = format!("{}{}", outer.name, inner.name);
            if strategy.matches(&concatenated, &target_member.name) {
                return Some((
                    smallvec![outer_idx, inner_idx],
                    PathInfo {
                        ty: inner.ty.clone(),
                        nullable: outer.nullable || inner.nullable,
                    },
                ));
            }
        }
    }
    None
}

/// Classify a binding and record it, or record the target member as
/// unconvertible when no conversion path exists.
fn bind(
    graph: &TypeGraph,
    outcome: &mut MatchOutcome,
    source_info: PathInfo,
    source_path: SmallVec<[usize; 2]>,
    target_idx: usize,
    target_member: &MemberDescriptor,
    via_directive: bool,
) {
    // Nullability is decided before the value conversion: an optional
    // source can never satisfy a non-optional target.
    if source_info.nullable && !target_member.nullable {
        outcome.unmatched.push(UnmatchedMember {
            target_member: target_idx,
            reason: UnmatchedReason::NotConvertible {
                source_member: source_path[0],
            },
        });
        return;
    }

    let Some(kind) = classify(graph, &source_info.ty, &target_member.ty) else {
        outcome.unmatched.push(UnmatchedMember {
            target_member: target_idx,
            reason: UnmatchedReason::NotConvertible {
                source_member: source_path[0],
            },
        });
        return;
    };

    outcome.mappings.push(PropertyMapping {
        target_member: target_idx,
        source_path,
        kind,
        via_directive,
        wrap_some: !source_info.nullable && target_member.nullable,
        through_option: source_info.nullable && target_member.nullable,
    });
}

/// Decide how a source value of `source_ty` becomes a target value of
/// `target_ty`, or `None` when no supported path exists.
fn classify(graph: &TypeGraph, source_ty: &TypeRef, target_ty: &TypeRef) -> Option<MappingKind> {
    if source_ty == target_ty {
        return Some(MappingKind::Direct {
            needs_clone: !source_ty.is_copy(),
        });
    }

    match (source_ty, target_ty) {
        (TypeRef::Named(_), TypeRef::Named(_)) => {
            let source_id = graph.resolve(source_ty)?;
            let target_id = graph.resolve(target_ty)?;
            let source_desc = graph.get(source_id);
            let target_desc = graph.get(target_id);
            if source_desc.is_class_like() && target_desc.is_class_like() {
                Some(MappingKind::Nested {
                    source: source_id,
                    target: target_id,
                })
            } else if source_desc.is_enum() && target_desc.is_enum() {
                Some(MappingKind::EnumValue {
                    source: source_id,
                    target: target_id,
                })
            } else {
                None
            }
        }
        (TypeRef::List(source_elem) | TypeRef::Set(source_elem), TypeRef::List(target_elem)) => {
            Some(MappingKind::Collection {
                container: ContainerKind::List,
                element: Box::new(classify(graph, source_elem, target_elem)?),
            })
        }
        (TypeRef::List(source_elem) | TypeRef::Set(source_elem), TypeRef::Set(target_elem)) => {
            Some(MappingKind::Collection {
                container: ContainerKind::Set,
                element: Box::new(classify(graph, source_elem, target_elem)?),
            })
        }
        _ => builtin_conversion(source_ty, target_ty).map(MappingKind::Convert),
    }
}

/// Invert forward mappings into the reverse direction (target back to
/// source). Only plain, invertible bindings survive: flattened chains,
/// one-way conversions, and `Some`-wrapping bindings leave their reverse
/// target member unmatched.
pub fn invert(
    graph: &TypeGraph,
    source: TypeId,
    forward: &MatchOutcome,
) -> (Vec<PropertyMapping>, Vec<UnmatchedMember>) {
    let source_ty = graph.get(source);
    let mut mappings = Vec::new();
    let mut unmatched = Vec::new();

    for (member_idx, member) in source_ty.members.iter().enumerate() {
        if member.ignore {
            continue;
        }
        let consumed = forward
            .mappings
            .iter()
            .find(|m| !m.is_flattened() && m.source_path[0] == member_idx);
        let inverted = consumed.and_then(|m| {
            if m.wrap_some {
                // Reversing would unwrap an option into a required member.
                return None;
            }
            invert_kind(&m.kind, &member.ty).map(|kind| PropertyMapping {
                target_member: member_idx,
                source_path: smallvec![m.target_member],
                kind,
                via_directive: m.via_directive,
                wrap_some: false,
                through_option: m.through_option,
            })
        });
        match inverted {
            Some(mapping) => mappings.push(mapping),
            None => unmatched.push(UnmatchedMember {
                target_member: member_idx,
                reason: UnmatchedReason::NoCandidate,
            }),
        }
    }

    (mappings, unmatched)
}

/// Invert a mapping kind. `reverse_target_ty` is the declared type of the
/// member the reverse routine writes into (the original source member),
/// which decides the reconstructed container kind.
fn invert_kind(kind: &MappingKind, reverse_target_ty: &TypeRef) -> Option<MappingKind> {
    match kind {
        MappingKind::Direct { needs_clone } => Some(MappingKind::Direct {
            needs_clone: *needs_clone,
        }),
        MappingKind::Nested { source, target } => Some(MappingKind::Nested {
            source: *target,
            target: *source,
        }),
        MappingKind::EnumValue { source, target } => Some(MappingKind::EnumValue {
            source: *target,
            target: *source,
        }),
        MappingKind::Collection { element, .. } => {
            let container = match reverse_target_ty {
                TypeRef::Set(_) => ContainerKind::Set,
                _ => ContainerKind::List,
            };
            let element_ty = reverse_target_ty.element().unwrap_or(reverse_target_ty);
            Some(MappingKind::Collection {
                container,
                element: Box::new(invert_kind(element, element_ty)?),
            })
        }
        // Widening and to-string conversions are one-way.
        MappingKind::Convert(_) => None,
    }
}
