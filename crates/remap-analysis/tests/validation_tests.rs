//! Diagnostics engine behavior: structural rules, coverage, severities.

use remap_analysis::{PlanBuilder, validate_plan};
use remap_common::DiagnosticCategory;
use remap_common::diagnostics::codes;
use remap_graph::{
    DirectiveFlags, HookSet, MappingDirective, MemberDescriptor, TypeDescriptor, TypeGraph,
    TypeGraphBuilder, TypeRef,
};
use rustc_hash::FxHashSet;

fn graph_of(types: Vec<TypeDescriptor>) -> TypeGraph {
    let mut builder = TypeGraphBuilder::new();
    for t in types {
        builder.add_type(t);
    }
    builder.build()
}

/// Build the directive's root plan and validate it, treating every built
/// plan pair as explicitly declared.
fn build_and_validate(
    graph: &TypeGraph,
    directive: &MappingDirective,
) -> (bool, Vec<remap_common::Diagnostic>) {
    let (plans, _) = PlanBuilder::new(graph).build_directive(directive);
    let explicit: FxHashSet<_> = plans.iter().map(|p| p.pair()).collect();
    validate_plan(graph, &plans[0], &explicit)
}

#[test]
fn wrong_target_kind_for_object_mapping() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User"),
        TypeDescriptor::an_enum("Status").value("Active"),
    ]);
    let (valid, diagnostics) = build_and_validate(&graph, &MappingDirective::new("User", "Status"));

    assert!(!valid);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, codes::MAPPING_TARGET_MUST_BE_CLASS_LIKE);
    assert_eq!(diagnostics[0].formatted_code(), "OM1001");
}

#[test]
fn wrong_target_kind_for_enum_mapping() {
    let graph = graph_of(vec![
        TypeDescriptor::an_enum("Status").value("Active"),
        TypeDescriptor::class("User"),
    ]);
    let (valid, diagnostics) = build_and_validate(&graph, &MappingDirective::new("Status", "User"));

    assert!(!valid);
    assert_eq!(diagnostics[0].code, codes::ENUM_TARGET_MUST_BE_ENUM);
    assert_eq!(diagnostics[0].formatted_code(), "EM2001");
}

#[test]
fn sealed_target_cannot_receive_generated_members() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User").member(MemberDescriptor::new("Name", TypeRef::String)),
        TypeDescriptor::class("UserDto")
            .sealed()
            .member(MemberDescriptor::new("Name", TypeRef::String)),
    ]);
    let (valid, diagnostics) = build_and_validate(&graph, &MappingDirective::new("User", "UserDto"));

    assert!(!valid);
    assert_eq!(diagnostics[0].code, codes::MAPPING_TARGET_NOT_EXTENSIBLE);
}

#[test]
fn required_member_without_mapping_is_exactly_one_error() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User").member(MemberDescriptor::new("Name", TypeRef::String)),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Name", TypeRef::String))
            .member(MemberDescriptor::new("Email", TypeRef::String).required()),
    ]);
    let (valid, diagnostics) = build_and_validate(&graph, &MappingDirective::new("User", "UserDto"));

    assert!(!valid);
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::REQUIRED_MEMBER_NOT_COVERED);
    assert!(errors[0].message_text.contains("Email"));
    assert!(errors[0].message_text.contains("UserDto"));
    assert!(errors[0].message_text.contains("User"));
    assert_eq!(errors[0].anchor_member.as_deref(), Some("Email"));
}

#[test]
fn adding_the_source_member_clears_the_coverage_error() {
    let user_dto = TypeDescriptor::class("UserDto")
        .member(MemberDescriptor::new("Email", TypeRef::String).required());

    let without = graph_of(vec![TypeDescriptor::class("User"), user_dto.clone()]);
    let (valid, _) = build_and_validate(&without, &MappingDirective::new("User", "UserDto"));
    assert!(!valid);

    let with = graph_of(vec![
        TypeDescriptor::class("User").member(MemberDescriptor::new("Email", TypeRef::String)),
        user_dto,
    ]);
    let (valid, diagnostics) = build_and_validate(&with, &MappingDirective::new("User", "UserDto"));
    assert!(valid);
    assert!(diagnostics.iter().all(|d| !d.is_error()));
}

#[test]
fn rename_directive_also_satisfies_required_coverage() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Contact", TypeRef::String).renamed_to("Email")),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Email", TypeRef::String).required()),
    ]);
    let (valid, _) = build_and_validate(&graph, &MappingDirective::new("User", "UserDto"));
    assert!(valid);
}

#[test]
fn fan_in_through_duplicate_renames_is_an_error() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Primary", TypeRef::String).renamed_to("Email"))
            .member(MemberDescriptor::new("Secondary", TypeRef::String).renamed_to("Email")),
        TypeDescriptor::class("UserDto").member(MemberDescriptor::new("Email", TypeRef::String)),
    ]);
    let (valid, diagnostics) = build_and_validate(&graph, &MappingDirective::new("User", "UserDto"));

    assert!(!valid);
    assert_eq!(diagnostics[0].code, codes::TARGET_MEMBER_MAPPED_TWICE);
    assert!(diagnostics[0].message_text.contains("Email"));
}

#[test]
fn derived_pair_without_direct_mapping_is_an_error() {
    let graph = graph_of(vec![
        TypeDescriptor::class("Animal").member(MemberDescriptor::new("Name", TypeRef::String)),
        TypeDescriptor::class("Dog").with_base("Animal"),
        TypeDescriptor::class("AnimalDto").member(MemberDescriptor::new("Name", TypeRef::String)),
        TypeDescriptor::class("DogDto").with_base("AnimalDto"),
    ]);
    let directive = MappingDirective::new("Animal", "AnimalDto").with_derived("Dog", "DogDto");
    let (plans, _) = PlanBuilder::new(&graph).build_directive(&directive);
    // Only the base pair is declared; (Dog, DogDto) is not.
    let explicit: FxHashSet<_> = plans
        .iter()
        .filter(|p| p.is_explicit())
        .map(|p| p.pair())
        .collect();
    let (valid, diagnostics) = validate_plan(&graph, &plans[0], &explicit);

    assert!(!valid);
    assert_eq!(diagnostics[0].code, codes::DERIVED_PAIR_NOT_MAPPED);
    assert!(diagnostics[0].message_text.contains("Dog"));
    assert!(diagnostics[0].message_text.contains("DogDto"));
}

#[test]
fn projection_over_nested_members_is_an_error() {
    let graph = graph_of(vec![
        TypeDescriptor::class("Address").member(MemberDescriptor::new("City", TypeRef::String)),
        TypeDescriptor::class("ApiAddress").member(MemberDescriptor::new("City", TypeRef::String)),
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Address", TypeRef::Named("Address".into()))),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Address", TypeRef::Named("ApiAddress".into()))),
    ]);
    let directive =
        MappingDirective::new("User", "UserDto").with_flags(DirectiveFlags::PROJECTION);
    let (valid, diagnostics) = build_and_validate(&graph, &directive);

    assert!(!valid);
    assert_eq!(diagnostics[0].code, codes::PROJECTION_NOT_SUPPORTED);
}

#[test]
fn projection_with_hooks_is_an_error() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User").member(MemberDescriptor::new("Name", TypeRef::String)),
        TypeDescriptor::class("UserDto").member(MemberDescriptor::new("Name", TypeRef::String)),
    ]);
    let directive = MappingDirective::new("User", "UserDto")
        .with_flags(DirectiveFlags::PROJECTION)
        .with_hooks(HookSet {
            before_map: Some("validate".into()),
            ..HookSet::default()
        });
    let (valid, diagnostics) = build_and_validate(&graph, &directive);

    assert!(!valid);
    assert_eq!(diagnostics[0].code, codes::PROJECTION_NOT_SUPPORTED);
}

#[test]
fn projection_over_scalar_and_enum_members_is_fine() {
    let graph = graph_of(vec![
        TypeDescriptor::an_enum("Status").value("Active"),
        TypeDescriptor::an_enum("ApiStatus").value("Active"),
        TypeDescriptor::class("User")
            .member(MemberDescriptor::new("Name", TypeRef::String))
            .member(MemberDescriptor::new("Status", TypeRef::Named("Status".into()))),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Name", TypeRef::String))
            .member(MemberDescriptor::new("Status", TypeRef::Named("ApiStatus".into()))),
    ]);
    let directive =
        MappingDirective::new("User", "UserDto").with_flags(DirectiveFlags::PROJECTION);
    let (valid, _) = build_and_validate(&graph, &directive);
    assert!(valid);
}

#[test]
fn unmapped_enum_values_warn_but_emit() {
    let graph = graph_of(vec![
        TypeDescriptor::an_enum("Status").value("Active").value("Archived"),
        TypeDescriptor::an_enum("ApiStatus").value("Active"),
    ]);
    let (valid, diagnostics) =
        build_and_validate(&graph, &MappingDirective::new("Status", "ApiStatus"));

    assert!(valid);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category, DiagnosticCategory::Warning);
    assert_eq!(diagnostics[0].code, codes::ENUM_VALUE_NOT_MAPPED);
    assert!(diagnostics[0].message_text.contains("Archived"));
}

#[test]
fn fully_matched_enum_pair_has_no_warnings() {
    let graph = graph_of(vec![
        TypeDescriptor::an_enum("Status")
            .value("None")
            .value("Pending")
            .value("Available")
            .value("Adopted"),
        TypeDescriptor::an_enum("ApiStatus")
            .value("Unknown")
            .value("Available")
            .value("Pending")
            .value("Adopted"),
    ]);
    let (valid, diagnostics) =
        build_and_validate(&graph, &MappingDirective::new("Status", "ApiStatus"));

    assert!(valid);
    assert!(diagnostics.is_empty());
}

#[test]
fn unmatched_optional_members_warn_but_emit() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User").member(MemberDescriptor::new("Name", TypeRef::String)),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Name", TypeRef::String))
            .member(MemberDescriptor::new("Extra", TypeRef::String)),
    ]);
    let (valid, diagnostics) = build_and_validate(&graph, &MappingDirective::new("User", "UserDto"));

    assert!(valid);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category, DiagnosticCategory::Warning);
    assert_eq!(diagnostics[0].code, codes::TARGET_MEMBER_NOT_MAPPED);
}

#[test]
fn factory_with_constructor_only_member_warns() {
    let graph = graph_of(vec![
        TypeDescriptor::class("User").member(MemberDescriptor::new("Id", TypeRef::Uuid)),
        TypeDescriptor::class("UserDto")
            .member(MemberDescriptor::new("Id", TypeRef::Uuid).constructor_only()),
    ]);
    let directive = MappingDirective::new("User", "UserDto").with_hooks(HookSet {
        factory: Some("make_dto".into()),
        ..HookSet::default()
    });
    let (valid, diagnostics) = build_and_validate(&graph, &directive);

    assert!(valid);
    assert_eq!(diagnostics[0].code, codes::FACTORY_SKIPS_CONSTRUCTOR_MEMBER);
    assert_eq!(diagnostics[0].category, DiagnosticCategory::Warning);
}

#[test]
fn bidirectional_coverage_checks_the_reverse_direction_too() {
    // Uuid -> string maps forward but cannot invert, so the required
    // source member is uncovered in reverse.
    let graph = graph_of(vec![
        TypeDescriptor::class("Event").member(MemberDescriptor::new("Id", TypeRef::Uuid).required()),
        TypeDescriptor::class("EventDto").member(MemberDescriptor::new("Id", TypeRef::String)),
    ]);
    let directive =
        MappingDirective::new("Event", "EventDto").with_flags(DirectiveFlags::BIDIRECTIONAL);
    let (valid, diagnostics) = build_and_validate(&graph, &directive);

    assert!(!valid);
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::REQUIRED_MEMBER_NOT_COVERED);
    assert!(errors[0].message_text.contains("Event"));
}
