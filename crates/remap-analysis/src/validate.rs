//! The diagnostics engine: structural validation of mapping plans.
//!
//! Checks run in a fixed order and fail fast per plan; independent plans
//! are unaffected by each other's failures. Errors suppress emission of
//! the affected plan only; warnings never block emission. The contract is
//! best-effort but never silently wrong: a plan that could misdirect data
//! into the wrong member does not emit, while acknowledged gaps (unmapped
//! enum values, unmatched optional members) emit with a warning.

use crate::plan::{
    EnumPlan, MappingKind, MappingPlan, ObjectPlan, PairKey, PropertyMapping, UnmatchedReason,
};
use remap_common::diagnostics::{Diagnostic, codes, format_message, messages};
use remap_graph::{Mutability, TypeGraph};
use rustc_hash::FxHashSet;

/// Validate one plan. Returns whether the plan may emit, plus its
/// diagnostics.
pub fn validate_plan(
    graph: &TypeGraph,
    plan: &MappingPlan,
    explicit_pairs: &FxHashSet<PairKey>,
) -> (bool, Vec<Diagnostic>) {
    match plan {
        MappingPlan::Object(object) => validate_object(graph, object, explicit_pairs),
        MappingPlan::Enum(enum_plan) => validate_enum(graph, enum_plan),
    }
}

fn validate_object(
    graph: &TypeGraph,
    plan: &ObjectPlan,
    explicit_pairs: &FxHashSet<PairKey>,
) -> (bool, Vec<Diagnostic>) {
    let source_ty = graph.get(plan.source);
    let target_ty = graph.get(plan.target);
    let source_name = source_ty.qualified_name();
    let target_name = target_ty.qualified_name();
    let mut diagnostics = Vec::new();

    // Target kind: a class/struct directive must target a class-like shape.
    if !target_ty.is_class_like() {
        diagnostics.push(Diagnostic::error(
            codes::MAPPING_TARGET_MUST_BE_CLASS_LIKE,
            &target_name,
            format_message(messages::MAPPING_TARGET_MUST_BE_CLASS_LIKE, &[&target_name]),
        ));
        return (false, diagnostics);
    }

    // Mapping container: the target must be open to generated members.
    if !target_ty.extensible {
        diagnostics.push(Diagnostic::error(
            codes::MAPPING_TARGET_NOT_EXTENSIBLE,
            &target_name,
            format_message(messages::MAPPING_TARGET_NOT_EXTENSIBLE, &[&target_name]),
        ));
        return (false, diagnostics);
    }

    // Every derived pair must have its own direct mapping declaration.
    let mut missing_pair = false;
    for &(derived_source, derived_target) in &plan.dispatch {
        if !explicit_pairs.contains(&(derived_source, derived_target)) {
            let ds = graph.get(derived_source).qualified_name();
            let dt = graph.get(derived_target).qualified_name();
            diagnostics.push(Diagnostic::error(
                codes::DERIVED_PAIR_NOT_MAPPED,
                &ds,
                format_message(messages::DERIVED_PAIR_NOT_MAPPED, &[&ds, &dt]),
            ));
            missing_pair = true;
        }
    }
    if missing_pair {
        return (false, diagnostics);
    }

    // Required-member coverage, forward then reverse.
    let mapped: FxHashSet<usize> = plan.mappings.iter().map(|m| m.target_member).collect();
    let mut uncovered = false;
    for (idx, member) in target_ty.members.iter().enumerate() {
        if member.required && !member.ignore && !mapped.contains(&idx) {
            diagnostics.push(
                Diagnostic::error(
                    codes::REQUIRED_MEMBER_NOT_COVERED,
                    &target_name,
                    format_message(
                        messages::REQUIRED_MEMBER_NOT_COVERED,
                        &[&member.name, &target_name, &source_name],
                    ),
                )
                .with_member(&member.name),
            );
            uncovered = true;
        }
    }
    if plan.directive.bidirectional() {
        let reverse_mapped: FxHashSet<usize> =
            plan.reverse_mappings.iter().map(|m| m.target_member).collect();
        for (idx, member) in source_ty.members.iter().enumerate() {
            if member.required && !member.ignore && !reverse_mapped.contains(&idx) {
                diagnostics.push(
                    Diagnostic::error(
                        codes::REQUIRED_MEMBER_NOT_COVERED,
                        &source_name,
                        format_message(
                            messages::REQUIRED_MEMBER_NOT_COVERED,
                            &[&member.name, &source_name, &target_name],
                        ),
                    )
                    .with_member(&member.name),
                );
                uncovered = true;
            }
        }
    }
    if uncovered {
        return (false, diagnostics);
    }

    // Fan-in: a target member bound by more than one source.
    if !plan.fan_in.is_empty() {
        for &idx in &plan.fan_in {
            let member = &target_ty.members[idx].name;
            diagnostics.push(
                Diagnostic::error(
                    codes::TARGET_MEMBER_MAPPED_TWICE,
                    &target_name,
                    format_message(messages::TARGET_MEMBER_MAPPED_TWICE, &[member, &target_name]),
                )
                .with_member(member),
            );
        }
        return (false, diagnostics);
    }

    // Projection must stay a pure member selection.
    if plan.directive.projection() && !projection_compatible(plan) {
        diagnostics.push(Diagnostic::error(
            codes::PROJECTION_NOT_SUPPORTED,
            &source_name,
            format_message(messages::PROJECTION_NOT_SUPPORTED, &[&source_name, &target_name]),
        ));
        return (false, diagnostics);
    }

    // Non-blocking coverage warnings.
    for unmatched in &plan.unmatched {
        let member = &target_ty.members[unmatched.target_member];
        match unmatched.reason {
            UnmatchedReason::NoCandidate => diagnostics.push(
                Diagnostic::warning(
                    codes::TARGET_MEMBER_NOT_MAPPED,
                    &target_name,
                    format_message(
                        messages::TARGET_MEMBER_NOT_MAPPED,
                        &[&member.name, &target_name, &source_name],
                    ),
                )
                .with_member(&member.name),
            ),
            UnmatchedReason::NotConvertible { source_member } => {
                let source_ref = source_ty.members[source_member].ty.to_string();
                let target_ref = member.ty.to_string();
                diagnostics.push(
                    Diagnostic::warning(
                        codes::MEMBER_TYPES_NOT_CONVERTIBLE,
                        &target_name,
                        format_message(
                            messages::MEMBER_TYPES_NOT_CONVERTIBLE,
                            &[&member.name, &source_ref, &target_ref],
                        ),
                    )
                    .with_member(&member.name),
                );
            }
        }
    }
    if plan.directive.hooks.factory.is_some() {
        for mapping in &plan.mappings {
            let member = &target_ty.members[mapping.target_member];
            if member.mutability == Mutability::ConstructorOnly {
                diagnostics.push(
                    Diagnostic::warning(
                        codes::FACTORY_SKIPS_CONSTRUCTOR_MEMBER,
                        &target_name,
                        format_message(
                            messages::FACTORY_SKIPS_CONSTRUCTOR_MEMBER,
                            &[&member.name, &target_name],
                        ),
                    )
                    .with_member(&member.name),
                );
            }
        }
    }

    (true, diagnostics)
}

fn validate_enum(graph: &TypeGraph, plan: &EnumPlan) -> (bool, Vec<Diagnostic>) {
    let source_ty = graph.get(plan.source);
    let target_ty = graph.get(plan.target);
    let source_name = source_ty.qualified_name();
    let target_name = target_ty.qualified_name();
    let mut diagnostics = Vec::new();

    // Target kind: an enum directive must target an enum.
    if !target_ty.is_enum() {
        diagnostics.push(Diagnostic::error(
            codes::ENUM_TARGET_MUST_BE_ENUM,
            &target_name,
            format_message(messages::ENUM_TARGET_MUST_BE_ENUM, &[&source_name, &target_name]),
        ));
        return (false, diagnostics);
    }

    // Unmapped source values degrade gracefully: the dispatch narrows and
    // the runtime fallback carries the rest, so these stay warnings.
    for value in plan.values.iter().filter(|v| !v.is_matched()) {
        diagnostics.push(Diagnostic::warning(
            codes::ENUM_VALUE_NOT_MAPPED,
            &source_name,
            format_message(
                messages::ENUM_VALUE_NOT_MAPPED,
                &[&value.source_value, &source_name, &target_name],
            ),
        ));
    }

    (true, diagnostics)
}

/// A projection is a pure member selection: no hooks, no nested object
/// construction anywhere (including collection elements), and no flattened
/// chain stepping through an optional member.
fn projection_compatible(plan: &ObjectPlan) -> bool {
    if !plan.directive.hooks.is_empty() {
        return false;
    }
    plan.mappings.iter().all(|m| projection_mapping_ok(m))
}

fn projection_mapping_ok(mapping: &PropertyMapping) -> bool {
    if mapping.is_flattened() && mapping.through_option {
        return false;
    }
    !kind_has_nested(&mapping.kind)
}

fn kind_has_nested(kind: &MappingKind) -> bool {
    match kind {
        MappingKind::Nested { .. } => true,
        MappingKind::Collection { element, .. } => kind_has_nested(element),
        _ => false,
    }
}
